//! Error types for the table cleaner.
//!
//! Every fallible operation returns [`CleanerError`]. Errors carry a stable
//! [`error_code`](CleanerError::error_code) and serialize as `{code, message}`
//! so a presentation layer can decide how to show them.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for table cleaning operations.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// The source could not be read or parsed into a table.
    #[error("Failed to load '{source_name}': {reason}")]
    Load { source_name: String, reason: String },

    /// An operation was invoked before any table was loaded.
    #[error("No table loaded")]
    NotLoaded,

    /// A statistic (mean, median, mode) is undefined because the column has
    /// no non-missing values.
    #[error("Column '{0}' has no non-missing values")]
    EmptyColumn(String),

    /// Standard deviation is zero, so the column cannot be scaled.
    #[error("Column '{0}' has zero variance")]
    ZeroVariance(String),

    /// The destination could not be written.
    #[error("Failed to export to '{destination}': {reason}")]
    Export { destination: String, reason: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A numeric column was required.
    #[error("Column '{column}' is not numeric (dtype {dtype})")]
    NotNumeric { column: String, dtype: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error with additional context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleanerError>,
    },
}

impl CleanerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleanerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        CleanerError::Load {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn export(destination: impl Into<String>, reason: impl ToString) -> Self {
        CleanerError::Export {
            destination: destination.into(),
            reason: reason.to_string(),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::NotLoaded => "NOT_LOADED",
            Self::EmptyColumn(_) => "EMPTY_COLUMN",
            Self::ZeroVariance(_) => "ZERO_VARIANCE",
            Self::Export { .. } => "EXPORT_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NotNumeric { .. } => "NOT_NUMERIC",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// True when the failure comes from the current data rather than from the
    /// caller or the environment (an undefined statistic).
    pub fn is_data_dependent(&self) -> bool {
        match self {
            Self::EmptyColumn(_) | Self::ZeroVariance(_) => true,
            Self::WithContext { source, .. } => source.is_data_dependent(),
            _ => false,
        }
    }
}

impl Serialize for CleanerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleanerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaner operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleanerError::Polars(e).with_context(context))
    }
}
