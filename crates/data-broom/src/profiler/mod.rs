//! Read-only analysis of a table.
//!
//! This module provides:
//! - Missing value and column type reports
//! - Descriptive statistics per column
//! - Structural overview (dtypes, non-null counts, memory estimate)
//! - Pairwise correlations and histograms for numeric columns

mod correlation;
mod statistics;

use crate::cleaner::duplicates;
use crate::error::{CleanerError, Result};
use crate::types::{
    ColumnInfo, ColumnTypeSummary, CorrelationMatrix, DescriptiveStats, HistogramBin,
    MissingCount, MissingValueReport, TableInfo,
};
use crate::utils::{ColumnKind, column_kind, missing_count, present_values};
use polars::prelude::*;

pub use correlation::{build_histogram, pearson};

/// Profiler for inspecting a table without changing it.
pub struct TableProfiler;

impl TableProfiler {
    /// Number of rows that repeat an earlier row exactly.
    pub fn duplicate_row_count(df: &DataFrame) -> Result<usize> {
        duplicates::count_duplicates(df)
    }

    /// Missing cells per column, in column order.
    pub fn missing_value_report(df: &DataFrame) -> MissingValueReport {
        let columns: Vec<MissingCount> = df
            .get_columns()
            .iter()
            .map(|col| MissingCount {
                column: col.name().to_string(),
                missing: missing_count(col.as_materialized_series()),
            })
            .collect();
        let total_missing = columns.iter().map(|c| c.missing).sum();
        MissingValueReport {
            columns,
            total_missing,
        }
    }

    /// Number of columns of each kind. Kinds with no columns are omitted.
    pub fn column_type_summary(df: &DataFrame) -> ColumnTypeSummary {
        let mut summary = ColumnTypeSummary::default();
        for col in df.get_columns() {
            *summary.counts.entry(column_kind(col.dtype())).or_insert(0) += 1;
        }
        summary
    }

    /// Descriptive statistics for every column.
    pub fn describe(df: &DataFrame) -> Result<DescriptiveStats> {
        statistics::describe(df)
    }

    /// Shape, per-column dtype and non-null count, and estimated size.
    pub fn table_info(df: &DataFrame) -> TableInfo {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                kind: column_kind(col.dtype()),
                non_null_count: col.len() - missing_count(col.as_materialized_series()),
            })
            .collect();

        TableInfo {
            row_count: df.height(),
            column_count: df.width(),
            columns,
            estimated_size_bytes: df.estimated_size(),
        }
    }

    /// Pearson correlations between numeric columns.
    pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
        correlation::correlation_matrix(df)
    }

    /// Equal-width histogram of a numeric column's non-missing values.
    pub fn histogram(df: &DataFrame, column: &str, bins: usize) -> Result<Vec<HistogramBin>> {
        if bins == 0 {
            return Err(CleanerError::InvalidConfig(
                "histogram needs at least one bin".to_string(),
            ));
        }

        let series = df
            .column(column)
            .map_err(|_| CleanerError::ColumnNotFound(column.to_string()))?
            .as_materialized_series();
        if column_kind(series.dtype()) != ColumnKind::Numeric {
            return Err(CleanerError::NotNumeric {
                column: column.to_string(),
                dtype: series.dtype().to_string(),
            });
        }

        Ok(build_histogram(&present_values(series)?, bins))
    }
}
