use crate::error::Result;
use crate::utils::{ColumnKind, column_kind, sorted_distinct_strings, text_values, unique_name};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Expands text columns into boolean indicator columns.
pub struct OneHotEncoder;

impl OneHotEncoder {
    /// One-hot encode every text column in place.
    ///
    /// Each text column is replaced, at its own position, by one boolean
    /// column per distinct value in sorted order, named
    /// `{column}{separator}{value}`. Missing cells are false in every
    /// indicator. A text column without any non-missing value has nothing to
    /// expand and is kept as it is. Returns the names of the generated columns.
    pub fn encode_all(
        df: &mut DataFrame,
        separator: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        let mut taken: HashSet<String> = df
            .get_columns()
            .iter()
            .filter(|col| column_kind(col.dtype()) != ColumnKind::Text)
            .map(|col| col.name().to_string())
            .collect();

        let mut columns: Vec<Column> = Vec::with_capacity(df.width());
        let mut generated = Vec::new();

        for col in df.get_columns() {
            if column_kind(col.dtype()) != ColumnKind::Text {
                columns.push(col.clone());
                continue;
            }

            let series = col.as_materialized_series();
            let indicators = Self::indicators(series, separator, &mut taken)?;
            if indicators.is_empty() {
                warn!("Keeping '{}': no non-missing values to encode", series.name());
                processing_steps.push(format!(
                    "Kept '{}' unchanged: no non-missing values to encode",
                    series.name()
                ));
                taken.insert(series.name().to_string());
                columns.push(col.clone());
                continue;
            }
            processing_steps.push(format!(
                "One-hot encoded '{}' into {} columns",
                series.name(),
                indicators.len()
            ));
            debug!(
                "Expanded '{}' into {} indicator columns",
                series.name(),
                indicators.len()
            );

            for indicator in indicators {
                generated.push(indicator.name().to_string());
                columns.push(Column::from(indicator));
            }
        }

        if !generated.is_empty() || columns.len() != df.width() {
            *df = DataFrame::new(columns)?;
        }
        Ok(generated)
    }

    /// Indicator columns for one text Series, named uniquely against `taken`.
    fn indicators(
        series: &Series,
        separator: &str,
        taken: &mut HashSet<String>,
    ) -> Result<Vec<Series>> {
        let values = text_values(series)?;
        let classes = sorted_distinct_strings(series)?;

        let mut indicators = Vec::with_capacity(classes.len());
        for class in &classes {
            let name = unique_name(&format!("{}{}{}", series.name(), separator, class), taken);
            taken.insert(name.clone());

            let flags: Vec<bool> = values
                .iter()
                .map(|v| v.as_deref() == Some(class.as_str()))
                .collect();
            indicators.push(Series::new(name.as_str().into(), flags));
        }
        Ok(indicators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    fn flags(df: &DataFrame, col: &str) -> Vec<Option<bool>> {
        df.column(col).unwrap().bool().unwrap().into_iter().collect()
    }

    #[test]
    fn test_columns_replace_source_in_place() {
        let mut df = df![
            "id" => [1i64, 2, 3],
            "color" => ["red", "blue", "red"],
            "size" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let generated = OneHotEncoder::encode_all(&mut df, "_", &mut steps).unwrap();

        assert_eq!(generated, vec!["color_blue", "color_red"]);
        assert_eq!(names(&df), vec!["id", "color_blue", "color_red", "size"]);
        assert_eq!(flags(&df, "color_red"), vec![Some(true), Some(false), Some(true)]);
        assert_eq!(df.column("color_blue").unwrap().dtype(), &DataType::Boolean);
    }

    #[test]
    fn test_each_row_has_exactly_one_true() {
        let mut df = df![
            "v" => ["a", "c", "b", "a", "c"],
        ]
        .unwrap();
        let mut steps = Vec::new();
        let generated = OneHotEncoder::encode_all(&mut df, "_", &mut steps).unwrap();
        assert_eq!(generated.len(), 3);

        for row in 0..df.height() {
            let trues = generated
                .iter()
                .filter(|name| flags(&df, name)[row] == Some(true))
                .count();
            assert_eq!(trues, 1, "row {row}");
        }
    }

    #[test]
    fn test_groups_follow_column_order() {
        let mut df = df![
            "b" => ["y", "x"],
            "a" => ["q", "p"],
        ]
        .unwrap();
        let mut steps = Vec::new();

        OneHotEncoder::encode_all(&mut df, "=", &mut steps).unwrap();

        assert_eq!(names(&df), vec!["b=x", "b=y", "a=p", "a=q"]);
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_missing_is_false_everywhere() {
        let mut df = df![
            "v" => [Some("a"), None],
        ]
        .unwrap();
        let mut steps = Vec::new();
        OneHotEncoder::encode_all(&mut df, "_", &mut steps).unwrap();
        assert_eq!(flags(&df, "v_a"), vec![Some(true), Some(false)]);
    }

    #[test]
    fn test_generated_name_collision_gets_suffix() {
        let mut df = df![
            "v" => ["a", "b"],
            "v_a" => [1i64, 2],
        ]
        .unwrap();
        let mut steps = Vec::new();
        OneHotEncoder::encode_all(&mut df, "_", &mut steps).unwrap();
        assert_eq!(names(&df), vec!["v_a_2", "v_b", "v_a"]);
    }

    #[test]
    fn test_no_text_columns_is_noop() {
        let mut df = df!["n" => [1.0, 2.0]].unwrap();
        let mut steps = Vec::new();
        let generated = OneHotEncoder::encode_all(&mut df, "_", &mut steps).unwrap();
        assert!(generated.is_empty());
        assert_eq!(names(&df), vec!["n"]);
    }

    #[test]
    fn test_all_missing_text_column_keeps_rows() {
        let mut df = df![
            "label" => [Option::<&str>::None, None, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let generated = OneHotEncoder::encode_all(&mut df, "_", &mut steps).unwrap();

        assert!(generated.is_empty());
        assert_eq!(df.shape(), (3, 1));
        assert_eq!(names(&df), vec!["label"]);
        assert!(steps[0].contains("Kept 'label' unchanged"));
    }

    #[test]
    fn test_all_missing_column_beside_encoded_one() {
        let mut df = df![
            "empty" => [Option::<&str>::None, None],
            "v" => ["a", "b"],
        ]
        .unwrap();
        let mut steps = Vec::new();

        OneHotEncoder::encode_all(&mut df, "_", &mut steps).unwrap();

        assert_eq!(names(&df), vec!["empty", "v_a", "v_b"]);
        assert_eq!(df.height(), 2);
    }
}
