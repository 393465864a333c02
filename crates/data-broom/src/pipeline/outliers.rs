//! Outlier handling module.
//!
//! Removes rows whose values fall outside the interquartile range fences.

use crate::error::{CleanerError, Result};
use crate::utils::{ColumnKind, column_kind, numeric_values, quantile_sorted, sort_floats};
use polars::prelude::*;
use tracing::debug;

/// Inclusive bounds a value must fall within to be kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute the fences `[Q1 - k*IQR, Q3 + k*IQR]` from unsorted values.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        let mut sorted = values.to_vec();
        sort_floats(&mut sorted);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Handles outlier detection and removal.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Remove rows containing outliers in the given columns, one column at a time.
    ///
    /// Each column's bounds are computed on the table as already filtered by
    /// the previous columns. Missing values are kept. Returns the number of
    /// rows removed.
    pub fn remove_outliers<S: AsRef<str>>(
        df: &mut DataFrame,
        columns: &[S],
        multiplier: f64,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let original_rows = df.height();

        for col_name in columns {
            let col_name = col_name.as_ref();
            let removed = Self::filter_column(df, col_name, multiplier, processing_steps)?;
            debug!("Removed {} outlier rows for '{}'", removed, col_name);
        }

        let rows_removed = original_rows - df.height();
        if rows_removed > 0 {
            processing_steps.push(format!("Removed {} rows containing outliers", rows_removed));
        }
        Ok(rows_removed)
    }

    /// Filter a single column against its own IQR fences.
    fn filter_column(
        df: &mut DataFrame,
        col_name: &str,
        multiplier: f64,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = df
            .column(col_name)
            .map_err(|_| CleanerError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series();

        if column_kind(series.dtype()) != ColumnKind::Numeric {
            return Err(CleanerError::NotNumeric {
                column: col_name.to_string(),
                dtype: series.dtype().to_string(),
            });
        }

        let values = numeric_values(series)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let bounds = IqrBounds::from_values(&present, multiplier)
            .ok_or_else(|| CleanerError::EmptyColumn(col_name.to_string()))?;

        // Keep null values
        let mask_values: Vec<bool> = values
            .iter()
            .map(|v| v.is_none_or(|val| bounds.contains(val)))
            .collect();
        let removed = mask_values.iter().filter(|keep| !**keep).count();

        processing_steps.push(format!(
            "'{}': bounds [{:.4}, {:.4}], removed {} rows",
            col_name, bounds.lower, bounds.upper, removed
        ));

        if removed > 0 {
            let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
            *df = df.filter(&mask)?;
        }
        Ok(removed)
    }
}
