//! CLI entry point for IQR outlier capping.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_outliers::utils::file_stem;
use lex_outliers::{
    OutlierConfig, OutlierHandler, OutlierTreatment, QuantileMethod, ReportGenerator,
    ReportParams,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// CLI-compatible outlier treatment enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTreatment {
    /// Clamp outliers to the nearest IQR fence
    Cap,
    /// Report outliers without changing values
    Flag,
}

impl From<CliTreatment> for OutlierTreatment {
    fn from(cli: CliTreatment) -> Self {
        match cli {
            CliTreatment::Cap => OutlierTreatment::Cap,
            CliTreatment::Flag => OutlierTreatment::Flag,
        }
    }
}

/// CLI-compatible quantile method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliQuantileMethod {
    /// Linear interpolation between order statistics
    Linear,
    /// Lower order statistic
    Lower,
    /// Higher order statistic
    Higher,
    /// Nearest order statistic
    Nearest,
    /// Midpoint of the two order statistics
    Midpoint,
}

impl From<CliQuantileMethod> for QuantileMethod {
    fn from(cli: CliQuantileMethod) -> Self {
        match cli {
            CliQuantileMethod::Linear => QuantileMethod::Linear,
            CliQuantileMethod::Lower => QuantileMethod::Lower,
            CliQuantileMethod::Higher => QuantileMethod::Higher,
            CliQuantileMethod::Nearest => QuantileMethod::Nearest,
            CliQuantileMethod::Midpoint => QuantileMethod::Midpoint,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "IQR outlier detection and capping",
    long_about = "Detects values outside the Tukey fences (Q1 - k*IQR, Q3 + k*IQR) of numeric \
                  columns and clamps them to the nearest fence.\n\n\
                  EXAMPLES:\n  \
                  # Cap every numeric column\n  \
                  lex-outliers -i sales.csv\n\n  \
                  # Only report outliers in two columns\n  \
                  lex-outliers -i sales.csv -c revenue -c units --treatment flag\n\n  \
                  # Extreme outliers only, JSON to stdout\n  \
                  lex-outliers -i sales.csv --multiplier 3 --json"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for capped data and reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Column to process (repeatable). Defaults to every numeric column
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// IQR multiplier for the fences
    #[arg(short, long, default_value = "1.5")]
    multiplier: f64,

    /// Quantile definition for Q1 and Q3
    #[arg(long, value_enum, default_value = "linear")]
    quantile_method: CliQuantileMethod,

    /// What to do with detected outliers
    #[arg(long, value_enum, default_value = "cap")]
    treatment: CliTreatment,

    /// Do not write the capped CSV
    #[arg(long)]
    no_save: bool,

    /// Skip columns with missing or non-numeric values instead of failing
    #[arg(long)]
    skip_invalid: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory as <input_name>_outliers.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries JSON.
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
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let mut config_builder = OutlierConfig::builder()
        .iqr_multiplier(args.multiplier)
        .quantile_method(args.quantile_method.into())
        .treatment(args.treatment.into())
        .output_dir(&args.output)
        .save_to_disk(!args.no_save)
        .skip_invalid(args.skip_invalid);

    if !args.columns.is_empty() {
        config_builder = config_builder.columns(args.columns.iter().cloned());
    }

    let config = config_builder.build()?;

    info!("Loading dataset from: {}", args.input);
    let mut data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let summaries = match OutlierHandler::handle_numeric_columns(&mut data, &config) {
        Ok(summaries) => summaries,
        Err(e) => {
            error!("Outlier handling failed: {}", e);
            return Err(anyhow!("Outlier handling failed: {}", e));
        }
    };

    let skipped: Vec<String> = OutlierHandler::target_columns(&data, &config)
        .into_iter()
        .filter(|c| !summaries.iter().any(|s| &s.column == c))
        .collect();

    let input_stem = file_stem(Path::new(&args.input));
    let generator = ReportGenerator::new(config.output_dir.clone());

    let output_file = if config.save_to_disk && config.treatment == OutlierTreatment::Cap {
        Some(generator.write_capped_csv(&mut data, &input_stem)?)
    } else {
        debug!("Skipping capped CSV output");
        None
    };
    let output_file = output_file.map(|p| p.display().to_string());

    let report = ReportGenerator::build_report(ReportParams {
        input_file: Some(&args.input),
        output_file: output_file.as_deref(),
        config: &config,
        rows: data.height(),
        summaries: &summaries,
        skipped_columns: &skipped,
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    println!("{}", ReportGenerator::render_text(&report));

    Ok(())
}

/// Load a CSV file, retrying without quote handling if the first pass fails.
fn load_csv(path: &str) -> Result<DataFrame> {
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| anyhow!("Failed to read CSV file {}: {}", path, e))
}
