//! Reporting seam between the conversion pipeline and the log sink.
//!
//! Pipeline stages never talk to the global subscriber directly; they are
//! handed a `&mut dyn Reporter`. The CLI passes [`TracingReporter`], tests
//! pass a `Vec<ConversionIssue>` and inspect what was collected.

use super::report::{ConversionIssue, ConversionSeverity};
use crate::error::Csv2CocoError;

/// Receives progress, dropped rows and fatal failures from a conversion.
pub trait Reporter {
    /// A row was dropped.
    fn issue(&mut self, issue: &ConversionIssue);

    /// A stage finished or started.
    fn progress(&mut self, _message: &str) {}

    /// The conversion stopped without producing a document.
    fn failure(&mut self, _error: &Csv2CocoError) {}
}

/// Forwards everything to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn issue(&mut self, issue: &ConversionIssue) {
        match issue.severity {
            ConversionSeverity::Error => tracing::error!(
                code = ?issue.code,
                row = issue.row + 1,
                line = issue.line,
                "Error processing row: {}",
                issue.message
            ),
            ConversionSeverity::Warning => tracing::warn!(
                code = ?issue.code,
                row = issue.row + 1,
                line = issue.line,
                "Skipping row: {}",
                issue.message
            ),
        }
    }

    fn progress(&mut self, message: &str) {
        tracing::info!("{}", message);
    }

    fn failure(&mut self, error: &Csv2CocoError) {
        tracing::error!("Conversion failed: {}", error);
    }
}

/// Collects issues; progress and failures are discarded.
impl Reporter for Vec<ConversionIssue> {
    fn issue(&mut self, issue: &ConversionIssue) {
        self.push(issue.clone());
    }
}
