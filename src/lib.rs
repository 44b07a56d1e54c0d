//! csv2coco: flat CSV bounding-box annotations to COCO JSON.
//!
//! The source is one row per box (`image, label, xmin, ymin, xmax, ymax`);
//! the output is a single COCO object-detection document whose image,
//! category and annotation ids are derived from content, so the same input
//! always yields the same ids.
//!
//! # Modules
//!
//! - [`ir`]: Source rows, COCO document types, CSV loader and JSON writer
//! - [`conversion`]: The conversion pipeline and its dropped-row report
//! - [`validation`]: Consistency checks over a finished document
//! - [`logging`]: Process-wide log sink setup for the CLI
//! - [`error`]: Error types for csv2coco operations
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use csv2coco::conversion::{convert_csv, save, ConvertOptions, TracingReporter};
//!
//! let options = ConvertOptions::default().with_image_size(1920, 1080);
//! let outcome = convert_csv(Path::new("export.csv"), &options, &mut TracingReporter)?;
//! println!("dropped {} row(s)", outcome.report.dropped_rows());
//! save(Path::new("out/annotations.json"), &outcome.document)?;
//! # Ok::<(), csv2coco::Csv2CocoError>(())
//! ```

pub mod conversion;
pub mod error;
pub mod ir;
pub mod logging;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use conversion::{ConvertOptions, TracingReporter, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};
use validation::{Severity, ValidateOptions, ValidationIssue};

pub use error::Csv2CocoError;

/// The csv2coco CLI application.
#[derive(Parser)]
#[command(name = "csv2coco")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Append log lines to this file.
    #[arg(long, global = true, default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log to the console only.
    #[arg(long, global = true)]
    no_log_file: bool,

    /// Log debug detail.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show only warnings and errors on the console.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV annotation export to a COCO JSON document.
    Convert(ConvertArgs),
    /// Check a COCO JSON document for id, reference and geometry problems.
    Validate(ValidateArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Source CSV file (header must contain image,label,xmin,ymin,xmax,ymax).
    input: PathBuf,

    /// Destination COCO JSON file; parent directories are created.
    #[arg(short, long, default_value = "annotations.json")]
    output: PathBuf,

    /// Width in pixels written on every image record.
    #[arg(
        long,
        env = "CSV2COCO_IMAGE_WIDTH",
        default_value_t = DEFAULT_IMAGE_WIDTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    image_width: u32,

    /// Height in pixels written on every image record.
    #[arg(
        long,
        env = "CSV2COCO_IMAGE_HEIGHT",
        default_value_t = DEFAULT_IMAGE_HEIGHT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    image_height: u32,

    /// Field delimiter of the source file (one ASCII character).
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Format of the conversion summary printed to stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Fail (after saving) if any row was dropped or the document has errors.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// COCO JSON file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    let s = if s == "\\t" { "\t" } else { s };
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err("DELIMITER must be a single ASCII character".to_string()),
    }
}

/// Run the csv2coco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Csv2CocoError> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("csv2coco {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Convert CSV bounding-box annotations to COCO JSON.");
        println!();
        println!("Run 'csv2coco --help' for usage information.");
        return Ok(());
    };

    logging::init_logging(&logging::LogOptions {
        file: (!cli.no_log_file).then_some(cli.log_file),
        verbose: cli.verbose,
        quiet: cli.quiet,
    })?;

    match command {
        Commands::Convert(args) => run_convert(args),
        Commands::Validate(args) => run_validate(args),
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), Csv2CocoError> {
    let options = ConvertOptions::default()
        .with_image_size(args.image_width, args.image_height)
        .with_delimiter(args.delimiter);

    let outcome = conversion::convert_csv(&args.input, &options, &mut TracingReporter)?;

    let validation = validation::validate_document(&outcome.document, &ValidateOptions::default());
    log_validation_issues(&validation.issues);

    if let Err(err) = conversion::save(&args.output, &outcome.document) {
        tracing::error!("Failed to save COCO document: {}", err);
        return Err(err);
    }

    match args.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.report).map_err(|source| {
                Csv2CocoError::CocoJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        ReportFormat::Text => print!("{}", outcome.report),
    }

    if args.strict {
        if !validation.is_ok() {
            return Err(Csv2CocoError::ValidationFailed {
                error_count: validation.error_count(),
                warning_count: validation.warning_count(),
                report: validation,
            });
        }
        if !outcome.report.is_complete() {
            return Err(Csv2CocoError::RowsDropped {
                dropped: outcome.report.dropped_rows(),
                rows: outcome.report.rows,
                report: Box::new(outcome.report),
            });
        }
    }

    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), Csv2CocoError> {
    let document = ir::io_coco_json::read_coco_json(&args.input)?;

    let opts = ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_document(&document, &opts);
    tracing::info!(
        "Validated {}: {} error(s), {} warning(s)",
        args.input.display(),
        report.error_count(),
        report.warning_count()
    );

    match args.output {
        ReportFormat::Json => {
            let summary = ValidationSummary {
                error_count: report.error_count(),
                warning_count: report.warning_count(),
                issues: &report.issues,
            };
            let json = serde_json::to_string_pretty(&summary).map_err(|source| {
                Csv2CocoError::CocoJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        ReportFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(Csv2CocoError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

#[derive(Serialize)]
struct ValidationSummary<'a> {
    error_count: usize,
    warning_count: usize,
    issues: &'a [ValidationIssue],
}

fn log_validation_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        match issue.severity {
            Severity::Error => tracing::error!("{}", issue),
            Severity::Warning => tracing::warn!("{}", issue),
        }
    }
}
