//! Standard scaling of numeric columns.

use crate::config::{CleanerConfig, StatisticPolicy};
use crate::error::{CleanerError, Result};
use crate::utils::{ColumnKind, columns_of_kind, mean, numeric_values, std_dev};
use polars::prelude::*;
use tracing::{debug, warn};

/// Rescales numeric columns to zero mean and unit variance.
pub struct StandardScaler;

impl StandardScaler {
    /// Scale every numeric column in place.
    ///
    /// Uses the population standard deviation. Missing cells stay missing and
    /// scaled columns become Float64. Returns the names of the scaled columns.
    pub fn scale_all(
        df: &mut DataFrame,
        config: &CleanerConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        if df.height() == 0 {
            debug!("Table has no rows, nothing to scale");
            return Ok(Vec::new());
        }

        let mut scaled = Vec::new();
        for col_name in columns_of_kind(df, ColumnKind::Numeric) {
            match Self::scale_column(df, &col_name) {
                Ok((mean, std)) => {
                    processing_steps.push(format!(
                        "Scaled '{}' (mean {:.4}, std {:.4})",
                        col_name, mean, std
                    ));
                    scaled.push(col_name);
                }
                Err(CleanerError::EmptyColumn(col))
                    if config.empty_column_policy == StatisticPolicy::Skip =>
                {
                    warn!("Skipping '{}': no non-missing values to scale", col);
                    processing_steps.push(format!("Skipped '{}': no non-missing values", col));
                }
                Err(CleanerError::ZeroVariance(col))
                    if config.zero_variance_policy == StatisticPolicy::Skip =>
                {
                    warn!("Skipping '{}': zero variance", col);
                    processing_steps.push(format!("Skipped '{}': zero variance", col));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(scaled)
    }

    /// Scale one numeric column. Returns the mean and std that were used.
    pub fn scale_column(df: &mut DataFrame, col_name: &str) -> Result<(f64, f64)> {
        let series = df
            .column(col_name)
            .map_err(|_| CleanerError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let values = numeric_values(&series)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();

        let mean = mean(&present).ok_or_else(|| CleanerError::EmptyColumn(col_name.to_string()))?;
        let std = std_dev(&present, 0)
            .ok_or_else(|| CleanerError::EmptyColumn(col_name.to_string()))?;
        if std == 0.0 || !std.is_finite() {
            return Err(CleanerError::ZeroVariance(col_name.to_string()));
        }

        let scaled: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| v.map(|val| (val - mean) / std))
            .collect();
        df.replace(col_name, Series::new(series.name().clone(), scaled))?;

        debug!("Scaled '{}' with mean {} and std {}", col_name, mean, std);
        Ok((mean, std))
    }
}
