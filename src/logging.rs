//! Process-wide log setup: console plus an append-only log file.
//!
//! Called once from [`crate::run`]. Library code only emits `tracing`
//! events (through [`crate::conversion::TracingReporter`]) and never
//! installs a subscriber itself.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::Csv2CocoError;

/// Default persistent sink, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "conversion.log";

#[derive(Clone, Debug, Default)]
pub struct LogOptions {
    /// Append log lines here as well as to the console.
    pub file: Option<PathBuf>,
    /// Debug level instead of info.
    pub verbose: bool,
    /// Console shows warnings and errors only; the file is unaffected.
    pub quiet: bool,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the level chosen by `verbose`.
pub fn init_logging(options: &LogOptions) -> Result<(), Csv2CocoError> {
    let default_level = if options.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csv2coco={}", default_level)));

    let console_level = if options.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::TRACE
    };
    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_level);

    let file_layer = match &options.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    Csv2CocoError::LogSetup(format!("{}: {}", parent.display(), e))
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Csv2CocoError::LogSetup(format!("{}: {}", path.display(), e)))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| Csv2CocoError::LogSetup(e.to_string()))
}
