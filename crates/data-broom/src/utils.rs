//! Shared utilities for the cleaning operations.
//!
//! Column kind classification, null-aware value extraction and the small
//! statistics helpers (quantiles, standard deviation, mode) used across modules.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Column Kind Utilities
// =============================================================================

/// Semantic category of a column, derived from its physical dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// String or categorical values
    Text,
    /// Boolean values
    Boolean,
    /// Date, datetime or time values
    Datetime,
    /// Anything else (nested, binary, null-typed)
    Other,
}

impl ColumnKind {
    /// Lowercase name used in reports and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Classify a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if is_datetime_dtype(dtype) {
        ColumnKind::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

/// Classify a Series.
#[inline]
pub fn series_kind(series: &Series) -> ColumnKind {
    column_kind(series.dtype())
}

/// Names of all columns of the given kind, in table order.
pub fn columns_of_kind(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| column_kind(col.dtype()) == kind)
        .map(|col| col.name().to_string())
        .collect()
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Values of a numeric Series as `f64`, nulls preserved positionally.
///
/// NaN counts as missing and comes back as `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Non-missing values of a numeric Series as `f64`, in row order.
pub fn present_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

/// Number of NaN cells in a float Series; zero for any other dtype.
pub fn nan_count(series: &Series) -> usize {
    match series.dtype() {
        DataType::Float64 => series
            .f64()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f64::is_nan)).count())
            .unwrap_or(0),
        DataType::Float32 => series
            .f32()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f32::is_nan)).count())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Missing cells of a Series: nulls plus NaN.
#[inline]
pub fn missing_count(series: &Series) -> usize {
    series.null_count() + nan_count(series)
}

/// Values of any Series rendered as text, nulls preserved positionally.
pub fn text_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Statistics
// =============================================================================

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// `ddof = 0` gives the population deviation, `ddof = 1` the sample one.
/// Returns `None` when fewer than `ddof + 1` values are available.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - ddof) as f64).sqrt())
}

/// Sort floats in place by IEEE total order.
pub fn sort_floats(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}

/// Quantile of sorted values using linear interpolation between closest ranks.
pub fn quantile_sorted(values: &[f64], quantile: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(values[lower]);
    }
    let weight = pos - lower as f64;
    Some(values[lower] + (values[upper] - values[lower]) * weight)
}

/// Median of unsorted values.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sort_floats(&mut sorted);
    quantile_sorted(&sorted, 0.5)
}

/// Most frequent non-null value of a Series and its count.
///
/// Ties go to the value that appears first in row order.
pub fn mode_with_count(series: &Series) -> PolarsResult<Option<(String, usize)>> {
    let values = text_values(series)?;

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, val) in values.iter().enumerate() {
        if let Some(val) = val {
            counts.entry(val.as_str()).or_insert((0, idx)).0 += 1;
        }
    }

    Ok(counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(val, (count, _))| (val.to_string(), count)))
}

/// Most frequent non-null value of a Series (first appearance wins ties).
pub fn string_mode(series: &Series) -> PolarsResult<Option<String>> {
    Ok(mode_with_count(series)?.map(|(val, _)| val))
}

/// Number of distinct non-null values.
pub fn distinct_count(series: &Series) -> PolarsResult<usize> {
    let values = text_values(series)?;
    Ok(values.iter().flatten().collect::<HashSet<_>>().len())
}

/// Distinct non-null values of a Series rendered as text, sorted.
pub fn sorted_distinct_strings(series: &Series) -> PolarsResult<Vec<String>> {
    let mut distinct: Vec<String> = text_values(series)?
        .into_iter()
        .flatten()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    distinct.sort();
    Ok(distinct)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled: Vec<f64> = numeric_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<String> = text_values(series)?
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill_value.to_string()))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Replace NaN with null in every float column.
///
/// Returns the number of cells changed.
pub fn nan_to_null(df: &mut DataFrame) -> PolarsResult<usize> {
    let targets: Vec<(String, usize)> = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), nan_count(col.as_materialized_series())))
        .filter(|(_, nans)| *nans > 0)
        .collect();

    for (name, _) in &targets {
        let cleaned = {
            let series = df.column(name)?.as_materialized_series();
            match series.dtype() {
                DataType::Float32 => series
                    .f32()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect::<Float32Chunked>()
                    .into_series(),
                _ => series
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect::<Float64Chunked>()
                    .into_series(),
            }
        };
        df.replace(name, cleaned.with_name(name.as_str().into()))?;
    }

    Ok(targets.iter().map(|(_, nans)| nans).sum())
}

/// Make `base` unique against `taken` by appending `_2`, `_3`, ...
pub fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind() {
        assert_eq!(column_kind(&DataType::Int64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Float32), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::String), ColumnKind::Text);
        assert_eq!(column_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind(&DataType::Date), ColumnKind::Datetime);
        assert_eq!(
            column_kind(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            ColumnKind::Datetime
        );
    }

    #[test]
    fn test_columns_of_kind_preserves_order() {
        let df = df![
            "b" => [1.0, 2.0],
            "name" => ["x", "y"],
            "a" => [3i64, 4],
        ]
        .unwrap();
        assert_eq!(columns_of_kind(&df, ColumnKind::Numeric), vec!["b", "a"]);
        assert_eq!(columns_of_kind(&df, ColumnKind::Text), vec!["name"]);
    }

    #[test]
    fn test_quantile_sorted_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(quantile_sorted(&values, 0.25), Some(2.0));
        assert_eq!(quantile_sorted(&values, 0.75), Some(4.0));
        assert_eq!(quantile_sorted(&[1.0, 2.0], 0.5), Some(1.5));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let series = Series::new("x".into(), [Some(1.0), None, Some(f64::NAN), Some(4.0)]);
        assert_eq!(nan_count(&series), 1);
        assert_eq!(missing_count(&series), 2);
        assert_eq!(present_values(&series).unwrap(), vec![1.0, 4.0]);
        assert_eq!(
            numeric_values(&series).unwrap(),
            vec![Some(1.0), None, None, Some(4.0)]
        );

        let ints = Series::new("n".into(), [Some(1i64), None]);
        assert_eq!(nan_count(&ints), 0);
        assert_eq!(missing_count(&ints), 1);
    }

    #[test]
    fn test_nan_to_null() {
        let mut df = df![
            "x" => [Some(1.0), Some(f64::NAN), None],
            "y" => [Some(1.0f32), Some(f32::NAN), Some(f32::NAN)],
            "s" => ["NaN", "a", "b"],
        ]
        .unwrap();

        assert_eq!(nan_to_null(&mut df).unwrap(), 3);

        assert_eq!(df.column("x").unwrap().null_count(), 2);
        assert_eq!(df.column("y").unwrap().null_count(), 2);
        assert_eq!(df.column("y").unwrap().dtype(), &DataType::Float32);
        assert_eq!(df.column("s").unwrap().null_count(), 0);
        assert_eq!(nan_to_null(&mut df).unwrap(), 0);
    }

    #[test]
    fn test_sort_floats_total_order() {
        let mut values = vec![3.0, -0.0, 1.0, -2.0, 0.0];
        sort_floats(&mut values);
        assert_eq!(values, vec![-2.0, -0.0, 0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(std_dev(&values, 0), Some(2.0));
        assert!((std_dev(&values, 1).unwrap() - 2.138089935).abs() < 1e-6);
        assert_eq!(std_dev(&[1.0], 1), None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_string_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_tie_goes_to_first_appearance() {
        let series = Series::new("test".into(), &[Some("b"), None, Some("a"), Some("a"), Some("b")]);
        assert_eq!(string_mode(&series).unwrap(), Some("b".to_string()));
    }

    #[test]
    fn test_mode_with_count_all_null() {
        let series = Series::new("test".into(), &[Option::<&str>::None, None]);
        assert_eq!(mode_with_count(&series).unwrap(), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1i64), None, Some(3)]);
        let filled = fill_numeric_nulls(&series, 2.0).unwrap();

        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 2.0);
        assert_eq!(filled.null_count(), 0);
    }

    #[test]
    fn test_fill_string_nulls_keeps_values_unquoted() {
        let series = Series::new("test".into(), &[Some("x"), None]);
        let filled = fill_string_nulls(&series, "y").unwrap();
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("x"), Some("y")]);
    }

    #[test]
    fn test_sorted_distinct_strings() {
        let series = Series::new("test".into(), &[Some("b"), None, Some("a"), Some("b")]);
        assert_eq!(sorted_distinct_strings(&series).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_unique_name() {
        let taken: HashSet<String> = ["a".to_string(), "a_2".to_string()].into_iter().collect();
        assert_eq!(unique_name("b", &taken), "b");
        assert_eq!(unique_name("a", &taken), "a_3");
    }
}
