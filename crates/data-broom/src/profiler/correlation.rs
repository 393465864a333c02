//! Correlation and distribution views over numeric columns.

use crate::error::{Result, ResultExt};
use crate::types::{CorrelationMatrix, HistogramBin};
use crate::utils::{ColumnKind, columns_of_kind, numeric_values};
use polars::prelude::*;

/// Pearson correlation between every pair of numeric columns.
///
/// Each pair uses only the rows where both values are present.
pub(crate) fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let columns = columns_of_kind(df, ColumnKind::Numeric);

    let mut series_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in &columns {
        let values = numeric_values(df.column(name)?.as_materialized_series())
            .context(format!("Reading numeric column '{}'", name))?;
        series_values.push(values);
    }

    let size = columns.len();
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        for j in i..size {
            let (x, y): (Vec<f64>, Vec<f64>) = series_values[i]
                .iter()
                .zip(series_values[j].iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = pearson(&x, &y);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

/// Pearson's r, `None` with fewer than two pairs or a constant side.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x[..n].iter().zip(y[..n].iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Equal-width histogram over the given values.
///
/// All-equal input gives a single bin holding every value. The last bin is
/// closed on the right so the maximum is counted.
pub fn build_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &finite {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}
