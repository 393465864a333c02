//! Pipeline module.
//!
//! The mutating cleaning operations, as standalone handlers and as
//! [`CleaningStep`] values that can be chained.

pub mod outliers;
pub mod scaler;
mod step;

pub use outliers::{IqrBounds, OutlierHandler};
pub use scaler::StandardScaler;
pub use step::{AUTO_CLEAN_STEPS, CleaningStep, run_steps};
