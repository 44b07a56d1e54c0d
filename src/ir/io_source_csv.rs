//! Source CSV loader.
//!
//! Reads the flat annotation table (one row per bounding box) into a
//! [`SourceTable`]. The loader only checks structure: the header must name
//! every required column and at least one data row must follow. Cell
//! contents are not interpreted here.
//!
//! # Source CSV Format Reference
//!
//! Delimited text (comma by default) with a header row containing at least:
//! - `image`: The image file name
//! - `label`: Category/class name
//! - `xmin`, `ymin`, `xmax`, `ymax`: Absolute box corners in pixels
//!
//! Additional columns are ignored. When a column name appears more than
//! once, the first occurrence is used.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::model::{SourceRow, SourceTable};
use crate::error::Csv2CocoError;

/// Columns every source file must provide, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 6] = ["image", "label", "xmin", "ymin", "xmax", "ymax"];

// ============================================================================
// Public API
// ============================================================================

/// Reads a source table from a delimited file.
///
/// # Errors
/// - [`Csv2CocoError::MissingColumns`] listing every absent required column
/// - [`Csv2CocoError::EmptyInput`] when the header is followed by no rows
/// - [`Csv2CocoError::CsvParse`] when the text itself cannot be read
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use csv2coco::ir::io_source_csv::read_source_csv;
///
/// let table = read_source_csv(Path::new("annotations.csv"), b',')?;
/// # Ok::<(), csv2coco::Csv2CocoError>(())
/// ```
pub fn read_source_csv(path: &Path, delimiter: u8) -> Result<SourceTable, Csv2CocoError> {
    let file = File::open(path).map_err(Csv2CocoError::Io)?;
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    load_table(BufReader::new(file), delimiter, path, source_name)
}

/// Reads a comma-separated source table from a string.
///
/// Useful for testing without file I/O.
pub fn from_source_csv_str(csv_str: &str) -> Result<SourceTable, Csv2CocoError> {
    from_source_csv_slice(csv_str.as_bytes(), b',')
}

/// Reads a source table from raw bytes.
///
/// Useful for fuzzing and for callers that already hold the file contents.
pub fn from_source_csv_slice(bytes: &[u8], delimiter: u8) -> Result<SourceTable, Csv2CocoError> {
    load_table(bytes, delimiter, Path::new("<bytes>"), "<bytes>".to_string())
}

// ============================================================================
// Loading
// ============================================================================

/// Header positions of the required columns.
struct ColumnMap {
    image: usize,
    label: usize,
    xmin: usize,
    ymin: usize,
    xmax: usize,
    ymax: usize,
}

impl ColumnMap {
    /// Resolves all required columns, or returns every missing name.
    fn resolve(headers: &csv::StringRecord) -> Result<Self, Vec<String>> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let mut found = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, name) in found.iter_mut().zip(REQUIRED_COLUMNS) {
            match position(name) {
                Some(idx) => *slot = idx,
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        let [image, label, xmin, ymin, xmax, ymax] = found;
        Ok(Self {
            image,
            label,
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    /// Short rows yield empty cells rather than failing the load.
    fn row(&self, index: usize, line: u64, record: &csv::StringRecord) -> SourceRow {
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        SourceRow {
            index,
            line,
            image: cell(self.image).to_string(),
            label: cell(self.label).to_string(),
            xmin: cell(self.xmin).to_string(),
            ymin: cell(self.ymin).to_string(),
            xmax: cell(self.xmax).to_string(),
            ymax: cell(self.ymax).to_string(),
        }
    }
}

fn load_table<R: Read>(
    reader: R,
    delimiter: u8,
    path: &Path,
    source_name: String,
) -> Result<SourceTable, Csv2CocoError> {
    let parse_err = |source: csv::Error| Csv2CocoError::CsvParse {
        path: path.to_path_buf(),
        source,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(parse_err)?.clone();
    let columns = ColumnMap::resolve(&headers).map_err(|missing| Csv2CocoError::MissingColumns {
        path: path.to_path_buf(),
        missing,
    })?;

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while csv_reader.read_record(&mut record).map_err(parse_err)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        rows.push(columns.row(rows.len(), line, &record));
    }

    if rows.is_empty() {
        return Err(Csv2CocoError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(SourceTable { source_name, rows })
}

// ============================================================================
// Tests
// ============================================================================
