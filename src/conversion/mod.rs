//! The CSV -> COCO conversion pipeline.
//!
//! One sequential pass over one in-memory table:
//!
//! 1. load and check the source ([`crate::ir::io_source_csv`])
//! 2. index categories ([`CategoryIndex`])
//! 3. index images ([`ImageIndex`])
//! 4. build annotations ([`build_annotations`])
//!
//! Steps 2-4 cannot fail; rows they cannot use are dropped and recorded in
//! the [`ConversionReport`] returned with the document. Saving is a separate
//! step ([`save`]) so a failed write never discards a finished conversion.

mod annotations;
mod categories;
mod images;
mod options;
pub mod report;
mod reporter;

pub use annotations::build_annotations;
pub use categories::CategoryIndex;
pub use images::ImageIndex;
pub use options::{ConvertOptions, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};
pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};
pub use reporter::{Reporter, TracingReporter};

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Csv2CocoError;
use crate::ir::io_coco_json::write_coco_json;
use crate::ir::io_source_csv::read_source_csv;
use crate::ir::{CocoDocument, DocumentInfo, License, SourceRow, SourceTable};

/// A finished conversion: the document and what was dropped on the way.
#[derive(Clone, Debug)]
pub struct ConversionOutcome {
    pub document: CocoDocument,
    pub report: ConversionReport,
}

/// Loads `path` and converts it.
///
/// # Errors
/// Fails only if the source cannot be loaded (unreadable, missing columns,
/// no data rows). The failure is also passed to `reporter`.
pub fn convert_csv(
    path: &Path,
    options: &ConvertOptions,
    reporter: &mut dyn Reporter,
) -> Result<ConversionOutcome, Csv2CocoError> {
    reporter.progress(&format!("Starting conversion of {}", path.display()));

    let table = match read_source_csv(path, options.delimiter) {
        Ok(table) => table,
        Err(err) => {
            reporter.failure(&err);
            return Err(err);
        }
    };

    Ok(convert_table(&table, options, reporter))
}

/// Converts an already loaded table. Never fails.
pub fn convert_table(
    table: &SourceTable,
    options: &ConvertOptions,
    reporter: &mut dyn Reporter,
) -> ConversionOutcome {
    let stamp = options.timestamp();
    reporter.progress(&format!(
        "Loaded {} row(s) from {}",
        table.len(),
        table.source_name
    ));

    let categories = CategoryIndex::build(table, &stamp);
    reporter.progress(&format!("Indexed {} category(ies)", categories.len()));

    let images = ImageIndex::build(table, options);
    reporter.progress(&format!("Indexed {} image(s)", images.len()));

    let mut report = ConversionReport::new(&table.source_name, table.len());
    let annotations =
        build_annotations(table, &categories, &images, &stamp, &mut report, reporter);

    report.output = ConversionCounts {
        images: images.len(),
        categories: categories.len(),
        annotations: annotations.len(),
    };
    reporter.progress(&format!(
        "Built {} annotation(s), dropped {} row(s)",
        report.output.annotations,
        report.dropped_rows()
    ));

    let document = CocoDocument {
        info: DocumentInfo::new(table.source_name.as_str(), options.year(), stamp),
        licenses: vec![License::attribution_non_commercial()],
        images: images.into_images(),
        annotations,
        categories: categories.into_categories(),
    };

    ConversionOutcome { document, report }
}

/// Writes `document` to `path`; see [`write_coco_json`].
pub fn save(path: &Path, document: &CocoDocument) -> Result<(), Csv2CocoError> {
    write_coco_json(path, document)?;
    tracing::info!("Saved COCO document to {}", path.display());
    Ok(())
}

/// Rows per distinct non-blank key, in ascending key order.
fn tally<'a, F>(rows: &'a [SourceRow], key: F) -> BTreeMap<&'a str, usize>
where
    F: Fn(&'a SourceRow) -> &'a str,
{
    let mut counts = BTreeMap::new();
    for row in rows {
        let name = key(row);
        if !name.is_empty() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }
    counts
}
