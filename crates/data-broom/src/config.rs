//! Configuration for the table cleaner.
//!
//! Built with [`CleanerConfig::builder()`]; every builder call is optional and
//! [`build`](CleanerConfigBuilder::build) validates the result.

use serde::{Deserialize, Serialize};

/// Cell texts read as missing on load, in addition to empty fields.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn default_null_values() -> Vec<String> {
    DEFAULT_NULL_VALUES.iter().map(|v| v.to_string()).collect()
}

/// What to do when a column-wide statistic is undefined for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StatisticPolicy {
    /// Fail the whole operation and leave the table unchanged.
    #[default]
    Abort,
    /// Leave the offending column as is and carry on with the others.
    Skip,
}

/// Configuration for a [`TableCleaner`](crate::TableCleaner) session.
///
/// # Example
///
/// ```rust,ignore
/// use data_broom::config::{CleanerConfig, StatisticPolicy};
///
/// let config = CleanerConfig::builder()
///     .zero_variance_policy(StatisticPolicy::Skip)
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Policy when a column has missing cells but no non-missing values
    /// (fill), or no non-missing values at all (scale).
    /// Default: Abort
    pub empty_column_policy: StatisticPolicy,

    /// Policy when a numeric column has zero standard deviation during scaling.
    /// Default: Abort
    pub zero_variance_policy: StatisticPolicy,

    /// Multiplier applied to the IQR when computing outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Separator between the source column name and the value in one-hot
    /// column names.
    /// Default: "_"
    pub one_hot_separator: String,

    /// Number of rows sampled for CSV schema inference.
    /// Default: 1000
    pub infer_schema_length: usize,

    /// Whether date-like text columns are parsed as datetimes on load.
    /// Default: true
    pub try_parse_dates: bool,

    /// Cell texts treated as missing on load. Empty fields are always missing.
    /// Default: [`DEFAULT_NULL_VALUES`]
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            empty_column_policy: StatisticPolicy::default(),
            zero_variance_policy: StatisticPolicy::default(),
            iqr_multiplier: 1.5,
            one_hot_separator: "_".to_string(),
            infer_schema_length: 1000,
            try_parse_dates: true,
            null_values: default_null_values(),
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.one_hot_separator.is_empty() {
            return Err(ConfigValidationError::EmptySeparator);
        }

        if self.infer_schema_length == 0 {
            return Err(ConfigValidationError::InvalidSchemaLength(
                self.infer_schema_length,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a finite number above 0)")]
    InvalidIqrMultiplier(f64),

    #[error("One-hot separator must not be empty")]
    EmptySeparator,

    #[error("Invalid schema inference length: {0} (must be at least 1)")]
    InvalidSchemaLength(usize),
}

impl From<ConfigValidationError> for crate::error::CleanerError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CleanerError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    empty_column_policy: Option<StatisticPolicy>,
    zero_variance_policy: Option<StatisticPolicy>,
    iqr_multiplier: Option<f64>,
    one_hot_separator: Option<String>,
    infer_schema_length: Option<usize>,
    try_parse_dates: Option<bool>,
    null_values: Option<Vec<String>>,
}

impl CleanerConfigBuilder {
    /// Set the policy for columns without any non-missing value.
    pub fn empty_column_policy(mut self, policy: StatisticPolicy) -> Self {
        self.empty_column_policy = Some(policy);
        self
    }

    /// Set the policy for zero-variance columns during scaling.
    pub fn zero_variance_policy(mut self, policy: StatisticPolicy) -> Self {
        self.zero_variance_policy = Some(policy);
        self
    }

    /// Set the IQR multiplier used for outlier bounds.
    ///
    /// # Arguments
    /// * `multiplier` - Positive factor (e.g., 1.5 for the classic Tukey fences)
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the separator used when naming one-hot columns.
    pub fn one_hot_separator(mut self, separator: impl Into<String>) -> Self {
        self.one_hot_separator = Some(separator.into());
        self
    }

    /// Set how many rows are sampled for schema inference on load.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Enable or disable datetime parsing on load.
    pub fn try_parse_dates(mut self, enable: bool) -> Self {
        self.try_parse_dates = Some(enable);
        self
    }

    /// Replace the list of cell texts read as missing on load.
    ///
    /// An empty list leaves only empty fields as missing.
    pub fn null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let config = CleanerConfig {
            empty_column_policy: self.empty_column_policy.unwrap_or_default(),
            zero_variance_policy: self.zero_variance_policy.unwrap_or_default(),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            one_hot_separator: self.one_hot_separator.unwrap_or_else(|| "_".to_string()),
            infer_schema_length: self.infer_schema_length.unwrap_or(1000),
            try_parse_dates: self.try_parse_dates.unwrap_or(true),
            null_values: self.null_values.unwrap_or_else(default_null_values),
        };

        config.validate()?;
        Ok(config)
    }
}
