//! Data model for csv2coco.
//!
//! Two sides meet here: the source table read from CSV
//! ([`SourceTable`]/[`SourceRow`]) and the COCO document written as JSON
//! ([`CocoDocument`] and its records). Ids are content-derived newtypes so
//! image, category and annotation ids cannot be mixed up.
//!
//! # Example
//!
//! ```
//! use csv2coco::ir::{BBoxXYXY, CategoryId};
//!
//! let bbox = BBoxXYXY::from_xyxy(10.0, 10.0, 50.0, 40.0);
//! assert_eq!(bbox.to_xywh(), [10.0, 10.0, 40.0, 30.0]);
//! assert_eq!(CategoryId::for_label("fish"), CategoryId::for_label("fish"));
//! ```

mod bbox;
mod ids;
pub mod io_coco_json;
pub mod io_source_csv;
mod model;

pub use bbox::BBoxXYXY;
pub use ids::{digest_id, AnnotationId, CategoryId, ImageId, LicenseId};
pub use model::{
    Annotation, AnnotationMetadata, Category, CategoryMetadata, CocoDocument, DocumentInfo, Image,
    ImageMetadata, License, SourceRow, SourceTable, DATE_FORMAT, DEFAULT_SUPERCATEGORY,
    TIMESTAMP_FORMAT,
};
