//! Conversion report types for tracking dropped rows.
//!
//! Row-level problems never abort a conversion; they are collected here so
//! callers can see exactly which rows did not become annotations, similar
//! to how `validation::ValidationReport` tracks document issues.

use serde::Serialize;
use std::fmt;

/// A report generated during one conversion.
///
/// Every dropped row contributes exactly one issue, so
/// `rows - output.annotations == issues.len()`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Source file name.
    pub source: String,
    /// Number of data rows read from the source.
    pub rows: usize,
    /// Counts in the produced document.
    pub output: ConversionCounts,
    /// One entry per dropped row, in source order.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report for a source of `rows` data rows.
    pub fn new(source: impl Into<String>, rows: usize) -> Self {
        Self {
            source: source.into(),
            rows,
            ..Default::default()
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of error-level issues (unreadable rows).
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Error)
            .count()
    }

    /// Count of warning-level issues (degenerate geometry).
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Rows that did not become annotations.
    pub fn dropped_rows(&self) -> usize {
        self.rows.saturating_sub(self.output.annotations)
    }

    pub fn is_complete(&self) -> bool {
        self.dropped_rows() == 0
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converted {} ({} rows)", self.source, self.rows)?;
        writeln!(
            f,
            "  {} images, {} categories, {} annotations",
            self.output.images, self.output.categories, self.output.annotations
        )?;

        if self.issues.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(
            f,
            "Dropped {} row(s): {} error(s), {} warning(s)",
            self.dropped_rows(),
            self.error_count(),
            self.warning_count()
        )?;
        for issue in &self.issues {
            writeln!(f, "  - {}", issue)?;
        }

        Ok(())
    }
}

/// Counts of document elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
}

/// Why a single source row was dropped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
    /// 0-based data row index.
    pub row: usize,
    /// 1-based source line.
    pub line: u64,
}

impl ConversionIssue {
    /// Create an error-level issue (the row could not be read).
    pub fn error(
        code: ConversionIssueCode,
        row: usize,
        line: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Error,
            code,
            message: message.into(),
            row,
            line,
        }
    }

    /// Create a warning-level issue (the row was read but rejected by policy).
    pub fn warning(
        code: ConversionIssueCode,
        row: usize,
        line: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
            row,
            line,
        }
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} (line {}): {}",
            self.row + 1,
            self.line,
            self.message
        )
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// The row was well-formed but its box is degenerate.
    Warning,
    /// The row could not be turned into an annotation at all.
    Error,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report schema and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    // Row errors
    /// A coordinate cell is empty or absent.
    MissingCoordinate,
    /// A coordinate cell does not parse as a number.
    NonNumericCoordinate,
    /// A coordinate parsed to NaN or infinity.
    NonFiniteCoordinate,
    /// The row's image name has no image record.
    UnresolvedImage,
    /// The row's label has no category record.
    UnresolvedCategory,

    // Geometry policy
    /// xmax <= xmin.
    NonPositiveWidth,
    /// ymax <= ymin.
    NonPositiveHeight,
}
