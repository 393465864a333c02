//! The table cleaning session.
//!
//! [`TableCleaner`] owns at most one table at a time and exposes:
//! - Loading from a CSV file, an in-memory buffer or an existing frame
//! - Read-only inspection (shape, duplicates, missing values, statistics)
//! - Atomic mutating operations, individually or as the automatic sequence
//! - CSV export

pub(crate) mod duplicates;
pub mod names;

use crate::config::CleanerConfig;
use crate::error::{CleanerError, Result};
use crate::io;
use crate::pipeline::{AUTO_CLEAN_STEPS, CleaningStep, run_steps};
use crate::profiler::TableProfiler;
use crate::types::{
    ColumnTypeSummary, CorrelationMatrix, DescriptiveStats, FillMethod, HistogramBin,
    MissingValueReport, StepSummary, TableInfo,
};
use crate::utils::{ColumnKind, column_kind};
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// A cleaning session over a single table.
///
/// Every mutating operation runs on a working copy and only replaces the
/// held table when it succeeds, so a failed operation leaves the session as
/// it was.
#[derive(Debug, Clone, Default)]
pub struct TableCleaner {
    table: Option<DataFrame>,
    config: CleanerConfig,
    history: Vec<StepSummary>,
}

static_assertions::assert_impl_all!(TableCleaner: Send);

impl TableCleaner {
    /// Create an empty session with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with a validated configuration.
    pub fn with_config(config: CleanerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Adopt an existing frame as the loaded table.
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self {
            table: Some(df),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Summaries of the operations applied since the last load.
    pub fn history(&self) -> &[StepSummary] {
        &self.history
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// The loaded table.
    pub fn table(&self) -> Result<&DataFrame> {
        self.table.as_ref().ok_or(CleanerError::NotLoaded)
    }

    /// Take the loaded table out of the session.
    pub fn into_table(self) -> Result<DataFrame> {
        self.table.ok_or(CleanerError::NotLoaded)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load a CSV file, replacing any previous table.
    ///
    /// On failure the previous table (if any) is kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame> {
        let df = io::read_csv_path(path.as_ref(), &self.config)?;
        Ok(self.replace_table(df))
    }

    /// Load CSV content from memory, replacing any previous table.
    pub fn load_from_bytes(
        &mut self,
        bytes: impl Into<Vec<u8>>,
        source_name: &str,
    ) -> Result<&DataFrame> {
        let df = io::read_csv_bytes(bytes.into(), source_name, &self.config)?;
        Ok(self.replace_table(df))
    }

    fn replace_table(&mut self, df: DataFrame) -> &DataFrame {
        if self.table.is_some() {
            info!("Replacing previously loaded table");
        }
        self.history.clear();
        self.table.insert(df)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn row_count(&self) -> Result<usize> {
        Ok(self.table()?.height())
    }

    pub fn column_count(&self) -> Result<usize> {
        Ok(self.table()?.width())
    }

    /// Rows equal to an earlier row in every column.
    pub fn duplicate_row_count(&self) -> Result<usize> {
        TableProfiler::duplicate_row_count(self.table()?)
    }

    pub fn missing_value_report(&self) -> Result<MissingValueReport> {
        Ok(TableProfiler::missing_value_report(self.table()?))
    }

    pub fn column_type_summary(&self) -> Result<ColumnTypeSummary> {
        Ok(TableProfiler::column_type_summary(self.table()?))
    }

    /// Numeric summary for numeric columns, count/unique/top/freq for the rest.
    pub fn describe(&self) -> Result<DescriptiveStats> {
        TableProfiler::describe(self.table()?)
    }

    pub fn info(&self) -> Result<TableInfo> {
        Ok(TableProfiler::table_info(self.table()?))
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Result<DataFrame> {
        Ok(self.table()?.head(Some(n)))
    }

    pub fn correlation_matrix(&self) -> Result<CorrelationMatrix> {
        TableProfiler::correlation_matrix(self.table()?)
    }

    pub fn histogram(&self, column: &str, bins: usize) -> Result<Vec<HistogramBin>> {
        TableProfiler::histogram(self.table()?, column, bins)
    }

    /// Kind of the named column.
    pub fn column_kind(&self, column: &str) -> Result<ColumnKind> {
        let col = self
            .table()?
            .column(column)
            .map_err(|_| CleanerError::ColumnNotFound(column.to_string()))?;
        Ok(column_kind(col.dtype()))
    }

    // =========================================================================
    // Mutating operations
    // =========================================================================

    /// Apply a single step atomically and record its summary.
    pub fn apply(&mut self, step: &CleaningStep) -> Result<StepSummary> {
        let mut working = self.table()?.clone();
        let summary = match step.apply(&mut working, &self.config) {
            Ok(summary) => summary,
            Err(e) => {
                warn!("{} failed, table left unchanged: {}", step, e);
                return Err(e);
            }
        };

        self.table = Some(working);
        self.history.push(summary.clone());
        Ok(summary)
    }

    /// Apply several steps as one atomic unit.
    ///
    /// Either every step succeeds and the result is committed, or the table
    /// is left exactly as it was.
    pub fn apply_all(&mut self, steps: &[CleaningStep]) -> Result<Vec<StepSummary>> {
        let table = self.table()?;
        let (cleaned, summaries) = match run_steps(table, steps, &self.config) {
            Ok(result) => result,
            Err(e) => {
                warn!("Cleaning failed, table left unchanged: {}", e);
                return Err(e);
            }
        };

        self.table = Some(cleaned);
        self.history.extend(summaries.iter().cloned());
        Ok(summaries)
    }

    pub fn remove_duplicates(&mut self) -> Result<StepSummary> {
        self.apply(&CleaningStep::RemoveDuplicates)
    }

    pub fn standardize_column_names(&mut self) -> Result<StepSummary> {
        self.apply(&CleaningStep::StandardizeColumnNames)
    }

    pub fn fill_missing(&mut self, method: FillMethod) -> Result<StepSummary> {
        self.apply(&CleaningStep::FillMissing(method))
    }

    pub fn encode_categorical_label(&mut self) -> Result<StepSummary> {
        self.apply(&CleaningStep::EncodeLabel)
    }

    pub fn encode_categorical_one_hot(&mut self) -> Result<StepSummary> {
        self.apply(&CleaningStep::EncodeOneHot)
    }

    pub fn scale_numeric(&mut self) -> Result<StepSummary> {
        self.apply(&CleaningStep::ScaleNumeric)
    }

    /// Remove IQR outliers for each listed column, in the order given.
    pub fn remove_outliers<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<StepSummary> {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self.apply(&CleaningStep::RemoveOutliers(columns))
    }

    /// Deduplicate, fill with means, standardize names, label-encode and scale.
    ///
    /// Atomic as a whole. Returns one summary per stage.
    pub fn auto_clean(&mut self) -> Result<Vec<StepSummary>> {
        info!("Starting automatic cleaning...");
        let summaries = self.apply_all(&AUTO_CLEAN_STEPS)?;
        info!("Automatic cleaning completed successfully");
        Ok(summaries)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Write the table as CSV to `path`.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        io::write_csv_path(self.table()?, path.as_ref())
    }

    /// Write the table as CSV to any writer.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let df = self.table()?;
        io::write_csv(df, writer).map_err(|e| CleanerError::export("writer", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatisticPolicy;
    use pretty_assertions::assert_eq;

    fn people() -> TableCleaner {
        let df = df![
            "Name" => [Some("Al"), Some("Bo"), Some("Al"), None],
            "Age" => [Some(30i64), None, Some(30), Some(50)],
        ]
        .unwrap();
        TableCleaner::from_dataframe(df)
    }

    fn csv_of(cleaner: &TableCleaner) -> String {
        let mut buf = Vec::new();
        cleaner.write_csv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ========================================================================
    // State tests
    // ========================================================================

    #[test]
    fn test_unloaded_operations_fail() {
        let mut cleaner = TableCleaner::new();
        assert!(!cleaner.is_loaded());
        assert!(matches!(cleaner.row_count(), Err(CleanerError::NotLoaded)));
        assert!(matches!(cleaner.describe(), Err(CleanerError::NotLoaded)));
        assert!(matches!(cleaner.remove_duplicates(), Err(CleanerError::NotLoaded)));
        assert!(matches!(cleaner.auto_clean(), Err(CleanerError::NotLoaded)));
        assert!(matches!(
            cleaner.write_csv(Vec::new()),
            Err(CleanerError::NotLoaded)
        ));
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = CleanerConfig {
            iqr_multiplier: -1.0,
            ..CleanerConfig::default()
        };
        let err = TableCleaner::with_config(config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_load_from_bytes_replaces_table_and_history() {
        let mut cleaner = people();
        cleaner.remove_duplicates().unwrap();
        assert_eq!(cleaner.history().len(), 1);

        cleaner.load_from_bytes("a,b\n1,2\n", "inline.csv").unwrap();

        assert_eq!(cleaner.row_count().unwrap(), 1);
        assert_eq!(cleaner.column_count().unwrap(), 2);
        assert!(cleaner.history().is_empty());
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let mut cleaner = people();
        let err = cleaner.load_from_bytes("a,a\n1,2\n", "dup.csv").unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
        assert_eq!(cleaner.row_count().unwrap(), 4);
    }

    // ========================================================================
    // Inspection tests
    // ========================================================================

    #[test]
    fn test_inspection() {
        let cleaner = people();
        assert_eq!(cleaner.duplicate_row_count().unwrap(), 1);
        assert_eq!(cleaner.missing_value_report().unwrap().total_missing, 2);
        assert_eq!(
            cleaner.column_type_summary().unwrap().count(ColumnKind::Numeric),
            1
        );
        assert_eq!(cleaner.head(2).unwrap().height(), 2);
        assert_eq!(cleaner.column_kind("Name").unwrap(), ColumnKind::Text);
        assert_eq!(
            cleaner.column_kind("nope").unwrap_err().error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    // ========================================================================
    // Mutation tests
    // ========================================================================

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let mut cleaner = people();
        let first = cleaner.remove_duplicates().unwrap();
        assert_eq!(first.rows_removed(), 1);
        let snapshot = cleaner.table().unwrap().clone();

        let second = cleaner.remove_duplicates().unwrap();
        assert_eq!(second.rows_removed(), 0);
        assert!(cleaner.table().unwrap().equals_missing(&snapshot));
    }

    #[test]
    fn test_fill_then_no_missing() {
        let mut cleaner = people();
        cleaner.fill_missing(FillMethod::Median).unwrap();
        assert_eq!(cleaner.missing_value_report().unwrap().total_missing, 0);
    }

    #[test]
    fn test_failed_operation_leaves_table_unchanged() {
        let df = df![
            "a" => [1.0, 2.0],
            "flat" => [4.0, 4.0],
        ]
        .unwrap();
        let mut cleaner = TableCleaner::from_dataframe(df.clone());

        let err = cleaner.scale_numeric().unwrap_err();

        assert!(matches!(err, CleanerError::ZeroVariance(ref c) if c == "flat"));
        assert!(cleaner.table().unwrap().equals_missing(&df));
        assert!(cleaner.history().is_empty());
    }

    #[test]
    fn test_remove_outliers_unknown_column_is_atomic() {
        let mut cleaner = TableCleaner::from_dataframe(
            df!["x" => [1i64, 2, 3, 4, 100]].unwrap(),
        );
        let err = cleaner.remove_outliers(&["x", "missing"]).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(cleaner.row_count().unwrap(), 5);

        let summary = cleaner.remove_outliers(&["x"]).unwrap();
        assert_eq!(summary.rows_after, 4);
    }

    #[test]
    fn test_manual_scenario() {
        let mut cleaner = TableCleaner::new();
        cleaner
            .load_from_bytes("name,age\nAl,30\nBo,\nAl,30\n", "people.csv")
            .unwrap();

        cleaner.remove_duplicates().unwrap();
        assert_eq!(cleaner.row_count().unwrap(), 2);

        cleaner.fill_missing(FillMethod::Mean).unwrap();
        let ages: Vec<Option<f64>> = cleaner
            .table()
            .unwrap()
            .column("age")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ages, vec![Some(30.0), Some(30.0)]);

        cleaner.encode_categorical_label().unwrap();
        let codes: Vec<Option<i64>> = cleaner
            .table()
            .unwrap()
            .column("name")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(codes, vec![Some(0), Some(1)]);
        assert_eq!(cleaner.history().len(), 3);
    }

    #[test]
    fn test_auto_clean_aborts_on_zero_variance() {
        let mut cleaner = TableCleaner::new();
        cleaner
            .load_from_bytes("Name,Age\nAl,30\nAl,30\nBo,\n", "people.csv")
            .unwrap();
        let before = cleaner.table().unwrap().clone();

        // Age becomes [30, 30] after filling, which cannot be scaled.
        let err = cleaner.auto_clean().unwrap_err();

        assert!(matches!(err, CleanerError::ZeroVariance(ref c) if c == "age"));
        assert!(cleaner.table().unwrap().equals_missing(&before));
        assert!(cleaner.history().is_empty());
    }

    #[test]
    fn test_auto_clean_with_skip_policy() {
        let config = CleanerConfig::builder()
            .zero_variance_policy(StatisticPolicy::Skip)
            .build()
            .unwrap();
        let mut cleaner = TableCleaner::with_config(config).unwrap();
        cleaner
            .load_from_bytes("Name,Age\nAl,30\nAl,30\nBo,\n", "people.csv")
            .unwrap();

        let summaries = cleaner.auto_clean().unwrap();

        assert_eq!(summaries.len(), 5);
        assert_eq!(cleaner.history().len(), 5);
        let df = cleaner.table().unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["name", "age"]);
        let name: Vec<Option<f64>> = df.column("name").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(name, vec![Some(-1.0), Some(1.0)]);
        let age: Vec<Option<f64>> = df.column("age").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(age, vec![Some(30.0), Some(30.0)]);
        assert!(csv_of(&cleaner).starts_with("name,age\n"));
    }
}
