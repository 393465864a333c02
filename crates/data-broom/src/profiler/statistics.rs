//! Descriptive statistics per column.

use crate::error::{Result, ResultExt};
use crate::types::{
    CategoricalSummary, ColumnDescription, ColumnStats, DescriptiveStats, NumericSummary,
};
use crate::utils::{
    ColumnKind, distinct_count, mean, mode_with_count, present_values, quantile_sorted,
    series_kind, sort_floats, std_dev,
};
use polars::prelude::*;

/// Describe every column of the frame, in table order.
pub(crate) fn describe(df: &DataFrame) -> Result<DescriptiveStats> {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| describe_series(col.as_materialized_series()))
        .collect::<Result<Vec<_>>>()?;
    Ok(DescriptiveStats { columns })
}

fn describe_series(series: &Series) -> Result<ColumnDescription> {
    let kind = series_kind(series);
    let stats = match kind {
        ColumnKind::Numeric => ColumnStats::Numeric(numeric_summary(series)?),
        _ => ColumnStats::Categorical(categorical_summary(series)?),
    };
    Ok(ColumnDescription {
        column: series.name().to_string(),
        kind,
        stats,
    })
}

/// Count, mean, sample std, min, quartiles and max over non-missing values.
pub(crate) fn numeric_summary(series: &Series) -> Result<NumericSummary> {
    let mut values = present_values(series)
        .context(format!("Summarizing column '{}'", series.name()))?;
    sort_floats(&mut values);

    Ok(NumericSummary {
        count: values.len(),
        mean: mean(&values),
        std: std_dev(&values, 1),
        min: values.first().copied(),
        q25: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q75: quantile_sorted(&values, 0.75),
        max: values.last().copied(),
    })
}

/// Count, distinct count and most frequent value over non-missing values.
pub(crate) fn categorical_summary(series: &Series) -> Result<CategoricalSummary> {
    let mode = mode_with_count(series)?;
    Ok(CategoricalSummary {
        count: series.len() - series.null_count(),
        unique: distinct_count(series)?,
        top: mode.as_ref().map(|(val, _)| val.clone()),
        freq: mode.map(|(_, count)| count),
    })
}
