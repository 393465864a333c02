use crate::error::{CleanerError, Result};
use crate::utils::{ColumnKind, columns_of_kind, sorted_distinct_strings, text_values};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Replaces text values with integer codes.
pub struct LabelEncoder;

impl LabelEncoder {
    /// Label-encode every text column. Returns the encoded column names.
    pub fn encode_all(
        df: &mut DataFrame,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        let text_columns = columns_of_kind(df, ColumnKind::Text);

        for col_name in &text_columns {
            let classes = Self::encode_column(df, col_name)?;
            processing_steps.push(format!(
                "Label-encoded '{}' ({} classes)",
                col_name, classes
            ));
        }

        Ok(text_columns)
    }

    /// Label-encode a single text column in place. Returns the class count.
    ///
    /// Codes run from 0 to k-1 following the sorted distinct values; missing
    /// cells stay missing.
    pub fn encode_column(df: &mut DataFrame, col_name: &str) -> Result<usize> {
        let series = df
            .column(col_name)
            .map_err(|_| CleanerError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let (codes, classes) = Self::codes(&series)?;
        df.replace(col_name, codes)?;

        debug!("Encoded '{}' into {} classes", col_name, classes);
        Ok(classes)
    }

    /// Integer codes for a text Series.
    pub(crate) fn codes(series: &Series) -> Result<(Series, usize)> {
        let classes = sorted_distinct_strings(series)?;
        let lookup: HashMap<&str, i64> = classes
            .iter()
            .enumerate()
            .map(|(code, val)| (val.as_str(), code as i64))
            .collect();

        let codes: Vec<Option<i64>> = text_values(series)?
            .iter()
            .map(|v| v.as_deref().and_then(|val| lookup.get(val).copied()))
            .collect();

        Ok((Series::new(series.name().clone(), codes), classes.len()))
    }
}
