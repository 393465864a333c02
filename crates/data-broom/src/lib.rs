//! Tabular Data Cleaning Library
//!
//! Load a CSV table, inspect it and run cleaning operations over it, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! - **Inspection**: Shape, duplicate rows, missing values per column, column
//!   kinds, descriptive statistics, correlations and histograms
//! - **Cleaning**: Duplicate removal, column name standardization, mean/median
//!   imputation, label and one-hot encoding, standard scaling, IQR outlier removal
//! - **Automatic mode**: A fixed cleaning sequence run as one atomic operation
//! - **Export**: Header plus rows, comma separated, no index column
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_broom::{FillMethod, TableCleaner};
//!
//! let mut cleaner = TableCleaner::new();
//! cleaner.load("data.csv")?;
//!
//! println!("{} duplicate rows", cleaner.duplicate_row_count()?);
//! println!("{:?}", cleaner.missing_value_report()?);
//!
//! cleaner.remove_duplicates()?;
//! cleaner.fill_missing(FillMethod::Median)?;
//! cleaner.remove_outliers(&["price", "quantity"])?;
//! cleaner.export("clean.csv")?;
//! ```
//!
//! # Atomicity
//!
//! Every mutating operation works on a copy of the table and commits only when
//! it succeeds. A failed operation returns a [`CleanerError`] and leaves the
//! table exactly as it was:
//!
//! ```rust,ignore
//! match cleaner.scale_numeric() {
//!     Ok(summary) => println!("{:?}", summary.messages),
//!     Err(CleanerError::ZeroVariance(col)) => println!("'{col}' is constant"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`CleanerConfig`] to choose how undefined statistics are handled and to
//! tune outlier fences, one-hot naming and CSV inference:
//!
//! ```rust,ignore
//! use data_broom::{CleanerConfig, StatisticPolicy, TableCleaner};
//!
//! let config = CleanerConfig::builder()
//!     .empty_column_policy(StatisticPolicy::Skip)
//!     .zero_variance_policy(StatisticPolicy::Skip)
//!     .iqr_multiplier(3.0)
//!     .build()?;
//!
//! let mut cleaner = TableCleaner::with_config(config)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod encoders;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::TableCleaner;
pub use cleaner::names::{standardize_name, standardize_names};
pub use config::{
    CleanerConfig, CleanerConfigBuilder, ConfigValidationError, DEFAULT_NULL_VALUES, StatisticPolicy,
};
pub use encoders::{LabelEncoder, OneHotEncoder};
pub use error::{CleanerError, Result as CleanerResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{
    AUTO_CLEAN_STEPS, CleaningStep, IqrBounds, OutlierHandler, StandardScaler, run_steps,
};
pub use profiler::TableProfiler;
pub use types::{
    CategoricalSummary, ColumnDescription, ColumnInfo, ColumnStats, ColumnTypeSummary,
    CorrelationMatrix, DescriptiveStats, FillMethod, HistogramBin, MissingCount,
    MissingValueReport, NumericSummary, StepSummary, TableInfo,
};
pub use utils::ColumnKind;
