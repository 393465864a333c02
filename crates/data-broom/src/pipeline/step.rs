//! The individual cleaning operations as values.

use crate::cleaner::{duplicates, names};
use crate::config::CleanerConfig;
use crate::encoders::{LabelEncoder, OneHotEncoder};
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::scaler::StandardScaler;
use crate::types::{FillMethod, StepSummary};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One mutating operation on a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "args", rename_all = "snake_case")]
pub enum CleaningStep {
    /// Drop exact duplicate rows, keeping the first occurrence.
    RemoveDuplicates,
    /// Lowercase, trim and underscore column names.
    StandardizeColumnNames,
    /// Fill missing numeric cells with the mean or median, text cells with the mode.
    FillMissing(FillMethod),
    /// Replace text values with integer codes.
    EncodeLabel,
    /// Replace text columns with boolean indicator columns.
    EncodeOneHot,
    /// Standardize numeric columns to zero mean and unit variance.
    ScaleNumeric,
    /// Drop rows outside the IQR fences of the listed columns, in order.
    RemoveOutliers(Vec<String>),
}

/// Stages of the automatic cleaning mode, in execution order.
pub const AUTO_CLEAN_STEPS: [CleaningStep; 5] = [
    CleaningStep::RemoveDuplicates,
    CleaningStep::FillMissing(FillMethod::Mean),
    CleaningStep::StandardizeColumnNames,
    CleaningStep::EncodeLabel,
    CleaningStep::ScaleNumeric,
];

impl CleaningStep {
    /// Stable name used in summaries and logs.
    pub fn name(&self) -> &'static str {
        match self {
            CleaningStep::RemoveDuplicates => "remove_duplicates",
            CleaningStep::StandardizeColumnNames => "standardize_column_names",
            CleaningStep::FillMissing(_) => "fill_missing",
            CleaningStep::EncodeLabel => "encode_categorical_label",
            CleaningStep::EncodeOneHot => "encode_categorical_one_hot",
            CleaningStep::ScaleNumeric => "scale_numeric",
            CleaningStep::RemoveOutliers(_) => "remove_outliers",
        }
    }

    /// Apply the step to `df` in place.
    ///
    /// On error `df` may be partially modified; callers that need atomicity
    /// run steps on a copy.
    pub fn apply(&self, df: &mut DataFrame, config: &CleanerConfig) -> Result<StepSummary> {
        let rows_before = df.height();
        let columns_before = df.width();
        let mut messages = Vec::new();

        info!("Running {}...", self.name());

        match self {
            CleaningStep::RemoveDuplicates => {
                let removed = duplicates::remove_duplicates(df)?;
                messages.push(format!("Removed {} duplicate rows", removed));
            }
            CleaningStep::StandardizeColumnNames => {
                let renamed = names::standardize_column_names(df)?;
                if renamed.is_empty() {
                    messages.push("Column names already standardized".to_string());
                }
                for (old, new) in renamed {
                    messages.push(format!("Renamed '{}' to '{}'", old, new));
                }
            }
            CleaningStep::FillMissing(method) => {
                StatisticalImputer::fill_missing(
                    df,
                    *method,
                    config.empty_column_policy,
                    &mut messages,
                )?;
            }
            CleaningStep::EncodeLabel => {
                LabelEncoder::encode_all(df, &mut messages)?;
            }
            CleaningStep::EncodeOneHot => {
                OneHotEncoder::encode_all(df, &config.one_hot_separator, &mut messages)?;
            }
            CleaningStep::ScaleNumeric => {
                StandardScaler::scale_all(df, config, &mut messages)?;
            }
            CleaningStep::RemoveOutliers(columns) => {
                OutlierHandler::remove_outliers(df, columns, config.iqr_multiplier, &mut messages)?;
            }
        }

        let summary = StepSummary {
            operation: self.name().to_string(),
            rows_before,
            rows_after: df.height(),
            columns_before,
            columns_after: df.width(),
            messages,
        };
        info!(
            "{} done: {:?} -> {:?}",
            summary.operation,
            (summary.rows_before, summary.columns_before),
            (summary.rows_after, summary.columns_after)
        );
        for message in &summary.messages {
            debug!("{}", message);
        }
        Ok(summary)
    }
}

impl std::fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleaningStep::FillMissing(method) => write!(f, "{}({})", self.name(), method.as_str()),
            CleaningStep::RemoveOutliers(columns) => {
                write!(f, "{}({})", self.name(), columns.join(", "))
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Run several steps in order on a copy of `df`.
///
/// Returns the cleaned frame and one summary per step, or the first error
/// with `df` untouched.
pub fn run_steps(
    df: &DataFrame,
    steps: &[CleaningStep],
    config: &CleanerConfig,
) -> Result<(DataFrame, Vec<StepSummary>)> {
    let mut working = df.clone();
    let summaries = steps
        .iter()
        .map(|step| step.apply(&mut working, config))
        .collect::<Result<Vec<_>>>()?;
    Ok((working, summaries))
}
