//! Source rows and the COCO document model.
//!
//! `SourceRow`/`SourceTable` hold the tabular input exactly as read; the
//! remaining types mirror the COCO JSON layout field for field, in the
//! key order the document is written with.

use serde::{Deserialize, Serialize};

use super::ids::{AnnotationId, CategoryId, ImageId, LicenseId};

/// Supercategory written on every category record.
pub const DEFAULT_SUPERCATEGORY: &str = "none";

/// `strftime` layout for full timestamps in the document.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `strftime` layout for date-only fields (`date_captured`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Source side
// ============================================================================

/// One annotation row of the source table.
///
/// Coordinates stay as raw cell text; numeric coercion happens per row in
/// the annotation builder so one bad cell cannot abort the whole load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRow {
    /// 0-based data row index (header excluded).
    pub index: usize,
    /// 1-based line in the source file, for messages.
    pub line: u64,
    pub image: String,
    pub label: String,
    pub xmin: String,
    pub ymin: String,
    pub xmax: String,
    pub ymax: String,
}

/// The whole source file, resident in memory.
#[derive(Clone, Debug, Default)]
pub struct SourceTable {
    /// File name recorded in `info.source`.
    pub source_name: String,
    pub rows: Vec<SourceRow>,
}

impl SourceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// COCO side
// ============================================================================

/// A complete COCO object-detection document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CocoDocument {
    #[serde(default)]
    pub info: DocumentInfo,

    #[serde(default)]
    pub licenses: Vec<License>,

    pub images: Vec<Image>,

    pub annotations: Vec<Annotation>,

    pub categories: Vec<Category>,
}

/// The fixed `info` block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    pub description: String,
    pub version: String,
    pub year: i32,
    pub contributor: String,
    pub date_created: String,
    pub url: String,
    /// File name of the CSV the document was built from.
    pub source: String,
}

impl DocumentInfo {
    pub const DESCRIPTION: &'static str = "Dataset converted from CSV to COCO format";
    pub const VERSION: &'static str = "2.0";
    pub const CONTRIBUTOR: &'static str = "Advanced Automatic Converter";
    pub const URL: &'static str = "https://example.com";

    pub fn new(source: impl Into<String>, year: i32, date_created: impl Into<String>) -> Self {
        Self {
            description: Self::DESCRIPTION.to_string(),
            version: Self::VERSION.to_string(),
            year,
            contributor: Self::CONTRIBUTOR.to_string(),
            date_created: date_created.into(),
            url: Self::URL.to_string(),
            source: source.into(),
        }
    }
}

/// A license entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: LicenseId,
    pub name: String,
    pub url: String,
}

impl License {
    /// The single license every converted image is attributed to.
    pub fn attribution_non_commercial() -> Self {
        Self {
            id: LicenseId::new(1),
            name: "Attribution-NonCommercial".to_string(),
            url: "https://creativecommons.org/licenses/by-nc/4.0/".to_string(),
        }
    }
}

/// An image record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,

    #[serde(default = "default_license")]
    pub license: LicenseId,

    pub file_name: String,

    pub height: u32,

    pub width: u32,

    #[serde(default)]
    pub date_captured: String,

    #[serde(default)]
    pub metadata: ImageMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    /// Number of source rows naming this image, dropped rows included.
    pub object_count: usize,
    pub processed_at: String,
}

/// A category record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,

    #[serde(default = "default_supercategory")]
    pub supercategory: String,

    #[serde(default)]
    pub metadata: CategoryMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMetadata {
    /// Number of source rows carrying this label, dropped rows included.
    pub count: usize,
    pub created_at: String,
}

/// An annotation record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,

    /// COCO layout: `[x, y, width, height]` with (x, y) the top-left corner.
    pub bbox: [f64; 4],

    pub area: f64,

    /// Always empty: the source carries no polygons.
    #[serde(default)]
    pub segmentation: Vec<Vec<f64>>,

    #[serde(default)]
    pub iscrowd: u8,

    #[serde(default)]
    pub metadata: AnnotationMetadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationMetadata {
    pub confidence: f64,
    pub created_at: String,
}

impl Default for AnnotationMetadata {
    fn default() -> Self {
        Self {
            confidence: 1.0,
            created_at: String::new(),
        }
    }
}

fn default_license() -> LicenseId {
    LicenseId::new(1)
}

fn default_supercategory() -> String {
    DEFAULT_SUPERCATEGORY.to_string()
}
