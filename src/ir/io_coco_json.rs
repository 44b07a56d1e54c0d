//! COCO JSON writer (and reader, for validating written documents).
//!
//! # Output
//!
//! The document is pretty-printed (2-space indent, UTF-8, non-ASCII kept
//! as-is). Missing parent directories are created. The bytes go to a
//! temporary file beside the destination and are renamed over it only once
//! fully flushed, so a failed save never leaves a truncated document at
//! the destination path.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::Builder;

use super::model::CocoDocument;
use crate::error::Csv2CocoError;

// ============================================================================
// Public API
// ============================================================================

/// Writes a document to a COCO JSON file.
///
/// # Errors
/// Returns [`Csv2CocoError::Write`] if the destination (or its parent
/// directories) cannot be created or written. The conversion result is
/// untouched and can be saved again elsewhere.
pub fn write_coco_json(path: &Path, document: &CocoDocument) -> Result<(), Csv2CocoError> {
    let write_err = |source: io::Error| Csv2CocoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_err)?;

    let mut staging = Builder::new();
    #[cfg(unix)]
    staging.permissions(unix_mode::plain_create());
    let mut staged = staging.tempfile_in(parent).map_err(write_err)?;
    #[cfg(unix)]
    if let Some(existing) = unix_mode::existing(path) {
        staged.as_file().set_permissions(existing).map_err(write_err)?;
    }
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
            if source.is_io() {
                write_err(source.into())
            } else {
                Csv2CocoError::CocoJsonWrite {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        writer.write_all(b"\n").map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }

    staged.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Staged files would otherwise stay owner-only (0o600) after the rename.
#[cfg(unix)]
mod unix_mode {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// What a plain create gets: 0o666 less the umask.
    pub(super) fn plain_create() -> fs::Permissions {
        fs::Permissions::from_mode(0o666)
    }

    /// An overwritten destination keeps its own mode.
    pub(super) fn existing(path: &Path) -> Option<fs::Permissions> {
        fs::metadata(path)
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.permissions())
    }
}

/// Reads a document from a COCO JSON file.
pub fn read_coco_json(path: &Path) -> Result<CocoDocument, Csv2CocoError> {
    let file = File::open(path).map_err(Csv2CocoError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| Csv2CocoError::CocoJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders a document exactly as [`write_coco_json`] would, minus the
/// trailing newline.
pub fn to_coco_string(document: &CocoDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Reads a document from a COCO JSON string.
///
/// Useful for testing without file I/O.
pub fn from_coco_str(json: &str) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a document from COCO JSON bytes.
pub fn from_coco_slice(bytes: &[u8]) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_slice(bytes)
}

// ============================================================================
// Tests
// ============================================================================
