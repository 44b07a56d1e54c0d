use std::path::PathBuf;
use thiserror::Error;

use crate::conversion::ConversionReport;
use crate::validation::ValidationReport;

/// The main error type for csv2coco operations.
#[derive(Debug, Error)]
pub enum Csv2CocoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV from {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column(s) in {path}: {}", .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("Input CSV {path} has no data rows")]
    EmptyInput { path: PathBuf },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize COCO JSON for {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to set up logging: {0}")]
    LogSetup(String),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("{dropped} of {rows} row(s) were dropped during conversion")]
    RowsDropped {
        dropped: usize,
        rows: usize,
        report: Box<ConversionReport>,
    },
}

impl Csv2CocoError {
    /// True when the document was built but could not be persisted.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            Csv2CocoError::Write { .. } | Csv2CocoError::CocoJsonWrite { .. }
        )
    }
}
