//! CLI entry point for the table cleaner.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use data_broom::{
    CleanerConfig, CleaningStep, ColumnStats, ColumnTypeSummary, DescriptiveStats, FillMethod,
    MissingValueReport, StatisticPolicy, StepSummary, TableCleaner, TableInfo,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// CLI-compatible cleaning step enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliStep {
    /// Remove duplicate rows
    Dedup,
    /// Standardize column names
    Standardize,
    /// Fill missing values (see --fill-method)
    Fill,
    /// Label-encode text columns
    LabelEncode,
    /// One-hot encode text columns
    OneHot,
    /// Scale numeric columns to zero mean and unit variance
    Scale,
    /// Remove IQR outliers in the --outlier-column columns
    RemoveOutliers,
}

/// CLI-compatible fill method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFillMethod {
    /// Use the mean of non-missing values
    Mean,
    /// Use the median of non-missing values
    Median,
}

impl From<CliFillMethod> for FillMethod {
    fn from(cli: CliFillMethod) -> Self {
        match cli {
            CliFillMethod::Mean => FillMethod::Mean,
            CliFillMethod::Median => FillMethod::Median,
        }
    }
}

/// CLI-compatible statistic policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPolicy {
    /// Fail and leave the table unchanged
    Abort,
    /// Leave the column as is and continue
    Skip,
}

impl From<CliPolicy> for StatisticPolicy {
    fn from(cli: CliPolicy) -> Self {
        match cli {
            CliPolicy::Abort => StatisticPolicy::Abort,
            CliPolicy::Skip => StatisticPolicy::Skip,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Inspect and clean tabular CSV data",
    long_about = "Inspect a CSV table and run cleaning operations over it.\n\n\
                  EXAMPLES:\n  \
                  # Summarize a dataset\n  \
                  data-broom inspect data.csv --head 5\n\n  \
                  # Run the automatic cleaning sequence\n  \
                  data-broom clean data.csv -o clean.csv --auto\n\n  \
                  # Run chosen steps in order\n  \
                  data-broom clean data.csv -o clean.csv --step dedup --step fill \\\n    \
                  --step remove-outliers --outlier-column price"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print shape, duplicates, missing values, column types and statistics
    Inspect(InspectArgs),
    /// Apply cleaning steps and export the result
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Path to the CSV file to inspect
    input: PathBuf,

    /// Also show the first N rows
    #[arg(long)]
    head: Option<usize>,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs; only the JSON document is written.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Path to the CSV file to clean
    input: PathBuf,

    /// Where to write the cleaned CSV
    #[arg(short, long)]
    output: PathBuf,

    /// Run the automatic sequence: dedup, fill (mean), standardize, label-encode, scale
    #[arg(long, conflicts_with = "steps")]
    auto: bool,

    /// Step to run; repeat to run several, in the order given
    #[arg(long = "step", value_enum)]
    steps: Vec<CliStep>,

    /// Column to filter for outliers; repeat for several, applied in order
    #[arg(long = "outlier-column")]
    outlier_columns: Vec<String>,

    /// Statistic used by the fill step for numeric columns
    #[arg(long, value_enum, default_value = "mean")]
    fill_method: CliFillMethod,

    /// What to do with a column that has no non-missing values
    #[arg(long, value_enum, default_value = "abort")]
    on_empty_column: CliPolicy,

    /// What to do with a constant numeric column when scaling
    #[arg(long, value_enum, default_value = "abort")]
    on_zero_variance: CliPolicy,

    /// IQR multiplier for outlier fences
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Output JSON to stdout instead of a human-readable summary
    #[arg(long)]
    json: bool,
}

/// Everything `inspect` reports, as one JSON document.
#[derive(Debug, Serialize)]
struct InspectReport {
    info: TableInfo,
    duplicate_rows: usize,
    missing: MissingValueReport,
    column_types: ColumnTypeSummary,
    statistics: DescriptiveStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_csv: Option<String>,
}

#[derive(Debug, Serialize)]
struct CleanReport {
    input: String,
    output: String,
    rows: usize,
    columns: usize,
    steps: Vec<StepSummary>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout only
/// carries the JSON document.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_output = match &cli.command {
        Command::Inspect(args) => args.json,
        Command::Clean(args) => args.json,
    };
    init_logging(&cli.log_level, cli.quiet, json_output);

    match cli.command {
        Command::Inspect(args) => run_inspect(&args),
        Command::Clean(args) => run_clean(&args),
    }
}

/// Print the inspection summary.
///
/// Uses `println!` on purpose: this is the command's output, not logging.
fn run_inspect(args: &InspectArgs) -> Result<()> {
    let mut cleaner = TableCleaner::new();
    cleaner
        .load(&args.input)
        .with_context(|| format!("Could not load {}", args.input.display()))?;

    let report = InspectReport {
        info: cleaner.info()?,
        duplicate_rows: cleaner.duplicate_row_count()?,
        missing: cleaner.missing_value_report()?,
        column_types: cleaner.column_type_summary()?,
        statistics: cleaner.describe()?,
        preview_csv: match args.head {
            Some(n) => {
                let preview = TableCleaner::from_dataframe(cleaner.head(n)?);
                let mut buf = Vec::new();
                preview.write_csv(&mut buf)?;
                Some(String::from_utf8(buf)?)
            }
            None => None,
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_section("DATASET OVERVIEW");
    println!("  File: {}", args.input.display());
    println!("  Rows: {}", report.info.row_count);
    println!("  Columns: {}", report.info.column_count);
    println!("  Duplicate rows: {}", report.duplicate_rows);
    println!("  Estimated size: {} bytes", report.info.estimated_size_bytes);
    println!();

    print_section("COLUMNS");
    println!(
        "{:<24} {:<14} {:<10} {:<10} {:<10}",
        "Column", "Dtype", "Kind", "Non-null", "Missing"
    );
    println!("{}", "-".repeat(72));
    for (col, missing) in report.info.columns.iter().zip(report.missing.columns.iter()) {
        println!(
            "{:<24} {:<14} {:<10} {:<10} {:<10}",
            truncate_str(&col.name, 23),
            truncate_str(&col.dtype, 13),
            col.kind,
            col.non_null_count,
            missing.missing
        );
    }
    println!();

    print_section("COLUMN TYPES");
    for (kind, count) in &report.column_types.counts {
        println!("  {:<10} {}", kind, count);
    }
    println!();

    print_section("STATISTICS");
    for desc in &report.statistics.columns {
        match &desc.stats {
            ColumnStats::Numeric(s) => println!(
                "  {:<24} count={} mean={} std={} min={} 25%={} 50%={} 75%={} max={}",
                truncate_str(&desc.column, 23),
                s.count,
                fmt_opt(s.mean),
                fmt_opt(s.std),
                fmt_opt(s.min),
                fmt_opt(s.q25),
                fmt_opt(s.median),
                fmt_opt(s.q75),
                fmt_opt(s.max)
            ),
            ColumnStats::Categorical(s) => println!(
                "  {:<24} count={} unique={} top={} freq={}",
                truncate_str(&desc.column, 23),
                s.count,
                s.unique,
                s.top.as_deref().unwrap_or("-"),
                s.freq.map(|f| f.to_string()).unwrap_or_else(|| "-".to_string())
            ),
        }
    }

    if let Some(n) = args.head {
        println!();
        print_section(&format!("FIRST {} ROWS", n));
        println!("{}", cleaner.head(n)?);
    }

    Ok(())
}

/// Reject step combinations that would silently do nothing.
fn check_step_args(args: &CleanArgs) -> Result<()> {
    if !args.auto && args.steps.is_empty() {
        bail!("Nothing to do: pass --auto or at least one --step");
    }
    let filters_outliers = args.steps.contains(&CliStep::RemoveOutliers);
    if filters_outliers && args.outlier_columns.is_empty() {
        bail!("--step remove-outliers needs at least one --outlier-column");
    }
    if !filters_outliers && !args.outlier_columns.is_empty() {
        bail!("--outlier-column is only used by --step remove-outliers");
    }
    Ok(())
}

fn run_clean(args: &CleanArgs) -> Result<()> {
    check_step_args(args)?;

    let config = CleanerConfig::builder()
        .empty_column_policy(args.on_empty_column.into())
        .zero_variance_policy(args.on_zero_variance.into())
        .iqr_multiplier(args.iqr_multiplier)
        .build()?;

    let mut cleaner = TableCleaner::with_config(config)?;
    cleaner
        .load(&args.input)
        .with_context(|| format!("Could not load {}", args.input.display()))?;

    let outcome = if args.auto {
        cleaner.auto_clean()
    } else {
        let steps: Vec<CleaningStep> = args
            .steps
            .iter()
            .map(|step| to_cleaning_step(*step, args))
            .collect();
        cleaner.apply_all(&steps)
    };
    let steps = match outcome {
        Ok(steps) => steps,
        Err(err) if err.is_data_dependent() => {
            return Err(anyhow::Error::new(err).context(
                "Cleaning stopped on a column without a usable statistic \
                 (--on-empty-column skip / --on-zero-variance skip leave such columns \
                 unchanged during fill and scale)",
            ));
        }
        Err(err) => return Err(err.into()),
    };

    cleaner
        .export(&args.output)
        .with_context(|| format!("Could not export to {}", args.output.display()))?;
    info!("Wrote {}", args.output.display());

    let report = CleanReport {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        rows: cleaner.row_count()?,
        columns: cleaner.column_count()?,
        steps,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_section("CLEANING SUMMARY");
    for step in &report.steps {
        println!(
            "  {:<28} rows {} -> {}, columns {} -> {}",
            step.operation, step.rows_before, step.rows_after, step.columns_before, step.columns_after
        );
        for message in &step.messages {
            println!("      - {}", message);
        }
    }
    println!();
    println!(
        "Wrote {} rows x {} columns to {}",
        report.rows, report.columns, report.output
    );

    Ok(())
}

fn to_cleaning_step(step: CliStep, args: &CleanArgs) -> CleaningStep {
    match step {
        CliStep::Dedup => CleaningStep::RemoveDuplicates,
        CliStep::Standardize => CleaningStep::StandardizeColumnNames,
        CliStep::Fill => CleaningStep::FillMissing(args.fill_method.into()),
        CliStep::LabelEncode => CleaningStep::EncodeLabel,
        CliStep::OneHot => CleaningStep::EncodeOneHot,
        CliStep::Scale => CleaningStep::ScaleNumeric,
        CliStep::RemoveOutliers => CleaningStep::RemoveOutliers(args.outlier_columns.clone()),
    }
}

fn print_section(title: &str) {
    println!("{}", title);
    println!("{}", "-".repeat(40));
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_args(argv: &[&str]) -> CleanArgs {
        let mut full = vec!["data-broom", "clean", "in.csv", "-o", "out.csv"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Clean(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_step_args_need_something_to_do() {
        assert!(check_step_args(&clean_args(&[])).is_err());
        assert!(check_step_args(&clean_args(&["--auto"])).is_ok());
        assert!(check_step_args(&clean_args(&["--step", "dedup"])).is_ok());
    }

    #[test]
    fn test_remove_outliers_needs_columns() {
        let args = clean_args(&["--step", "remove-outliers"]);
        assert!(check_step_args(&args).is_err());

        let args = clean_args(&["--step", "remove-outliers", "--outlier-column", "price"]);
        assert!(check_step_args(&args).is_ok());
    }

    #[test]
    fn test_outlier_columns_without_the_step_are_rejected() {
        let args = clean_args(&["--step", "dedup", "--outlier-column", "price"]);
        let err = check_step_args(&args).unwrap_err();
        assert!(err.to_string().contains("--outlier-column"));

        let args = clean_args(&["--auto", "--outlier-column", "price"]);
        assert!(check_step_args(&args).is_err());
    }

    #[test]
    fn test_to_cleaning_step_carries_outlier_columns() {
        let args = clean_args(&[
            "--step",
            "remove-outliers",
            "--outlier-column",
            "a",
            "--outlier-column",
            "b",
        ]);
        assert_eq!(
            to_cleaning_step(CliStep::RemoveOutliers, &args),
            CleaningStep::RemoveOutliers(vec!["a".to_string(), "b".to_string()])
        );
    }
}
