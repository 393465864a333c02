//! Statistical imputation methods.
//!
//! Mean or median for numeric columns, mode for text columns.

use crate::config::StatisticPolicy;
use crate::error::{CleanerError, Result};
use crate::types::FillMethod;
use crate::utils::{
    ColumnKind, column_kind, fill_numeric_nulls, fill_string_nulls, mean, median, missing_count,
    present_values, string_mode,
};
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing cells in every numeric and text column.
    ///
    /// Statistics are computed over each column's non-missing values at call
    /// time. Columns without missing cells, and boolean or datetime columns,
    /// are left untouched.
    pub fn fill_missing(
        df: &mut DataFrame,
        method: FillMethod,
        policy: StatisticPolicy,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let targets: Vec<(String, ColumnKind)> = df
            .get_columns()
            .iter()
            .filter(|col| missing_count(col.as_materialized_series()) > 0)
            .map(|col| (col.name().to_string(), column_kind(col.dtype())))
            .collect();

        for (col_name, kind) in targets {
            let outcome = match kind {
                ColumnKind::Numeric => {
                    Self::apply_numeric(df, &col_name, method, processing_steps).map(|_| ())
                }
                ColumnKind::Text => {
                    Self::apply_mode_imputation(df, &col_name, processing_steps).map(|_| ())
                }
                other => {
                    debug!("Leaving missing values in {} column '{}'", other, col_name);
                    continue;
                }
            };

            match outcome {
                Err(CleanerError::EmptyColumn(col)) if policy == StatisticPolicy::Skip => {
                    warn!("Skipping '{}': no non-missing values to impute from", col);
                    processing_steps.push(format!(
                        "Skipped '{}': no non-missing values to impute from",
                        col
                    ));
                }
                other => other?,
            }
        }

        Ok(())
    }

    /// Fill a numeric column with its mean or median. Returns the fill value.
    pub fn apply_numeric(
        df: &mut DataFrame,
        col_name: &str,
        method: FillMethod,
        processing_steps: &mut Vec<String>,
    ) -> Result<f64> {
        let series = df
            .column(col_name)
            .map_err(|_| CleanerError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let values = present_values(&series)?;
        let fill_value = match method {
            FillMethod::Mean => mean(&values),
            FillMethod::Median => median(&values),
        }
        .ok_or_else(|| CleanerError::EmptyColumn(col_name.to_string()))?;

        let missing = missing_count(&series);
        let filled = fill_numeric_nulls(&series, fill_value)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with {}: {:.2}",
            missing,
            col_name,
            method.as_str(),
            fill_value
        ));
        debug!("Filled '{}' with {} {}", col_name, method.as_str(), fill_value);

        Ok(fill_value)
    }

    /// Fill a text column with its most frequent value. Returns the fill value.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<String> {
        let series = df
            .column(col_name)
            .map_err(|_| CleanerError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let mode_val = string_mode(&series)?
            .ok_or_else(|| CleanerError::EmptyColumn(col_name.to_string()))?;

        let missing = missing_count(&series);
        let filled = fill_string_nulls(&series, &mode_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with mode: '{}'",
            missing, col_name, mode_val
        ));

        Ok(mode_val)
    }
}
