//! Imputation module for handling missing values.
//!
//! Statistical imputation: mean or median for numeric columns, mode for text
//! columns.

mod statistical;

pub use statistical::StatisticalImputer;
