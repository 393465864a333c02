//! CSV loading and export.
//!
//! Both directions are a single blocking pass over the whole dataset: the
//! source is read into memory at once and parsed with Polars' CSV reader, the
//! export serializes the full frame with `CsvWriter`.

use crate::config::CleanerConfig;
use crate::error::{CleanerError, Result};
use crate::utils::{nan_to_null, text_values};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info};

/// Read a CSV file into a DataFrame.
pub fn read_csv_path(path: &Path, config: &CleanerConfig) -> Result<DataFrame> {
    let source_name = path.display().to_string();
    if !path.exists() {
        return Err(CleanerError::load(source_name, "file not found"));
    }

    let bytes = std::fs::read(path).map_err(|e| CleanerError::load(&source_name, e))?;
    read_csv_bytes(bytes, &source_name, config)
}

/// Parse an in-memory CSV buffer into a DataFrame.
///
/// `source_name` is only used in error messages.
pub fn read_csv_bytes(bytes: Vec<u8>, source_name: &str, config: &CleanerConfig) -> Result<DataFrame> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(CleanerError::load(source_name, "source is empty"));
    }

    let header = read_header(&bytes, source_name)?;
    if let Some(duplicate) = first_duplicate(&header) {
        return Err(CleanerError::load(
            source_name,
            format!("duplicate column name '{duplicate}' in header"),
        ));
    }

    let null_values = (!config.null_values.is_empty()).then(|| {
        NullValues::AllColumns(
            config
                .null_values
                .iter()
                .map(|v| PlSmallStr::from(v.as_str()))
                .collect(),
        )
    });

    let parse_options = CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(null_values)
        .with_try_parse_dates(config.try_parse_dates);

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(config.infer_schema_length))
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| CleanerError::load(source_name, e))?;

    if df.width() == 0 {
        return Err(CleanerError::load(source_name, "no columns found"));
    }

    let nans = nan_to_null(&mut df).map_err(|e| CleanerError::load(source_name, e))?;
    if nans > 0 {
        debug!("Read {} NaN cells in '{}' as missing", nans, source_name);
    }

    info!(
        "Loaded '{}': {} rows x {} columns",
        source_name,
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Parse only the header record, every field read as text.
fn read_header(bytes: &[u8], source_name: &str) -> Result<Vec<String>> {
    let first_line_end = bytes
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(bytes.len());
    let first_line = bytes[..first_line_end]
        .strip_suffix(b"\r")
        .unwrap_or(&bytes[..first_line_end])
        .to_vec();

    let header_df = CsvReadOptions::default()
        .with_has_header(false)
        .with_n_rows(Some(1))
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .into_reader_with_file_handle(Cursor::new(first_line))
        .finish()
        .map_err(|e| CleanerError::load(source_name, e))?;

    let mut names = Vec::with_capacity(header_df.width());
    for col in header_df.get_columns() {
        let values = text_values(col.as_materialized_series())?;
        names.push(values.into_iter().next().flatten().unwrap_or_default());
    }

    debug!("Header of '{}': {:?}", source_name, names);
    Ok(names)
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}

/// Serialize a DataFrame as CSV (header row, no index column).
pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> PolarsResult<()> {
    let mut df = df.clone();
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
}

/// Write a DataFrame to a CSV file, replacing any existing file.
pub fn write_csv_path(df: &DataFrame, path: &Path) -> Result<()> {
    let destination = path.display().to_string();
    let file = File::create(path).map_err(|e| CleanerError::export(&destination, e))?;
    write_csv(df, file).map_err(|e| CleanerError::export(&destination, e))?;

    info!(
        "Exported {} rows x {} columns to '{}'",
        df.height(),
        df.width(),
        destination
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(content: &str) -> Result<DataFrame> {
        read_csv_bytes(
            content.as_bytes().to_vec(),
            "inline.csv",
            &CleanerConfig::default(),
        )
    }

    #[test]
    fn test_read_basic_csv() {
        let df = read("name,age\nAl,30\nBo,\n").unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_missing_markers() {
        let df = read("x,label\n1,a\nNA,null\n3,N/A\nnan,b\n").unwrap();

        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("x").unwrap().null_count(), 2);
        assert_eq!(df.column("label").unwrap().null_count(), 2);
    }

    #[test]
    fn test_read_nan_float_is_missing() {
        let config = CleanerConfig::builder()
            .null_values(Vec::<String>::new())
            .build()
            .unwrap();
        let df = read_csv_bytes(b"x\n1.5\nNaN\n3\n".to_vec(), "inline.csv", &config).unwrap();

        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("x").unwrap().null_count(), 1);
    }

    #[test]
    fn test_read_custom_missing_markers() {
        let config = CleanerConfig::builder().null_values(["?"]).build().unwrap();
        let df = read_csv_bytes(b"x,y\n1,NA\n?,b\n".to_vec(), "inline.csv", &config).unwrap();

        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("x").unwrap().null_count(), 1);
        // "NA" is ordinary text once the marker list is replaced
        assert_eq!(df.column("y").unwrap().null_count(), 0);
    }

    #[test]
    fn test_header_named_like_a_marker_is_kept() {
        let df = read("NA,x\n1,2\n").unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["NA", "x"]);
    }

    #[test]
    fn test_read_quoted_fields() {
        let df = read("city,note\n\"Paris, FR\",ok\n").unwrap();
        let city = df.column("city").unwrap().as_materialized_series().clone();
        assert_eq!(text_values(&city).unwrap(), vec![Some("Paris, FR".to_string())]);
    }

    #[test]
    fn test_read_empty_source() {
        let err = read("   \n").unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_read_duplicate_header() {
        let err = read("a,b,a\n1,2,3\n").unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
        assert!(err.to_string().contains("duplicate column name 'a'"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_csv_path(Path::new("/definitely/not/here.csv"), &CleanerConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_write_csv_has_header_and_no_index() {
        let df = df![
            "name" => ["Al", "Bo"],
            "age" => [30i64, 31],
        ]
        .unwrap();
        let mut buf = Vec::new();
        write_csv(&df, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "name,age\nAl,30\nBo,31\n");
    }

    #[test]
    fn test_first_duplicate() {
        let names = vec!["a".to_string(), "b".to_string(), "b".to_string()];
        assert_eq!(first_duplicate(&names), Some("b"));
        assert_eq!(first_duplicate(&names[..2]), None);
    }
}
