//! Validation of COCO documents.
//!
//! Checks a finished document for:
//! - Structural integrity (unique content ids, valid references)
//! - Data quality (non-empty names, positive dimensions)
//! - Geometric validity (finite positive boxes, consistent area, within image bounds)
//!
//! Content ids are truncated digests, so duplicate-id errors here mean
//! two distinct keys collided.

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::{HashMap, HashSet};

use crate::ir::{AnnotationId, BBoxXYXY, CategoryId, CocoDocument, ImageId, LicenseId};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Area may differ from `width * height` by this much before it is flagged.
const AREA_TOLERANCE: f64 = 1e-6;

/// Boxes may overhang the image by this many pixels.
const BOUNDS_TOLERANCE: f64 = 0.5;

/// Validates a document and returns a report of all issues found.
pub fn validate_document(document: &CocoDocument, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_images(document, &mut report);
    validate_categories(document, &mut report);
    validate_annotations(document, &mut report);

    report
}

fn validate_images(document: &CocoDocument, report: &mut ValidationReport) {
    let license_ids: HashSet<LicenseId> = document.licenses.iter().map(|l| l.id).collect();
    let mut seen_ids: HashMap<ImageId, &str> = HashMap::new();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for image in &document.images {
        let id = image.id.as_u64();

        if let Some(first) = seen_ids.get(&image.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateImageId,
                format!(
                    "Image ID {} shared by '{}' and '{}'",
                    id, first, image.file_name
                ),
                IssueContext::Image { id },
            ));
        } else {
            seen_ids.insert(image.id, &image.file_name);
        }

        if image.width == 0 || image.height == 0 {
            report.add(ValidationIssue::error(
                IssueCode::InvalidImageDimensions,
                format!(
                    "Invalid dimensions {}x{} (must be positive)",
                    image.width, image.height
                ),
                IssueContext::Image { id },
            ));
        }

        if image.file_name.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyFileName,
                "Empty filename",
                IssueContext::Image { id },
            ));
        } else if !seen_names.insert(&image.file_name) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateFileName,
                format!("File name '{}' listed more than once", image.file_name),
                IssueContext::Image { id },
            ));
        }

        if !license_ids.contains(&image.license) {
            report.add(ValidationIssue::warning(
                IssueCode::MissingLicenseRef,
                format!("References non-existent license {}", image.license),
                IssueContext::Image { id },
            ));
        }
    }
}

fn validate_categories(document: &CocoDocument, report: &mut ValidationReport) {
    let mut seen_ids: HashMap<CategoryId, &str> = HashMap::new();
    let mut seen_names: HashMap<&str, CategoryId> = HashMap::new();

    for category in &document.categories {
        let id = category.id.as_u64();

        if let Some(first) = seen_ids.get(&category.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateCategoryId,
                format!(
                    "Category ID {} shared by '{}' and '{}'",
                    id, first, category.name
                ),
                IssueContext::Category { id },
            ));
        } else {
            seen_ids.insert(category.id, &category.name);
        }

        if category.name.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyCategoryName,
                "Empty category name",
                IssueContext::Category { id },
            ));
        } else if let Some(first_id) = seen_names.get(category.name.as_str()) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateCategoryName,
                format!(
                    "Duplicate category name '{}' (also used by category {})",
                    category.name, first_id
                ),
                IssueContext::Category { id },
            ));
        } else {
            seen_names.insert(&category.name, category.id);
        }
    }
}

fn validate_annotations(document: &CocoDocument, report: &mut ValidationReport) {
    let image_dims: HashMap<ImageId, (u32, u32)> = document
        .images
        .iter()
        .map(|i| (i.id, (i.width, i.height)))
        .collect();
    let category_ids: HashSet<CategoryId> = document.categories.iter().map(|c| c.id).collect();
    let mut seen_ids: HashMap<AnnotationId, usize> = HashMap::new();

    for (idx, annotation) in document.annotations.iter().enumerate() {
        let id = annotation.id.as_u64();

        if let Some(first_idx) = seen_ids.get(&annotation.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateAnnotationId,
                format!(
                    "Duplicate annotation ID {} (first seen at index {})",
                    id, first_idx
                ),
                IssueContext::Annotation { id },
            ));
        } else {
            seen_ids.insert(annotation.id, idx);
        }

        if !image_dims.contains_key(&annotation.image_id) {
            report.add(ValidationIssue::error(
                IssueCode::MissingImageRef,
                format!("References non-existent image {}", annotation.image_id),
                IssueContext::Annotation { id },
            ));
        }

        if !category_ids.contains(&annotation.category_id) {
            report.add(ValidationIssue::error(
                IssueCode::MissingCategoryRef,
                format!(
                    "References non-existent category {}",
                    annotation.category_id
                ),
                IssueContext::Annotation { id },
            ));
        }

        let [x, y, w, h] = annotation.bbox;
        let bbox = BBoxXYXY::from_xywh(x, y, w, h);

        if !bbox.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::BBoxNotFinite,
                format!("Non-finite bbox [{}, {}, {}, {}]", x, y, w, h),
                IssueContext::Annotation { id },
            ));
            continue;
        }

        if !bbox.has_positive_extent() {
            report.add(ValidationIssue::error(
                IssueCode::BBoxNonPositiveExtent,
                format!("Non-positive extent: width {}, height {}", w, h),
                IssueContext::Annotation { id },
            ));
        }

        if (annotation.area - w * h).abs() > AREA_TOLERANCE {
            report.add(ValidationIssue::warning(
                IssueCode::AreaMismatch,
                format!(
                    "Area {} does not match bbox extent {} x {}",
                    annotation.area, w, h
                ),
                IssueContext::Annotation { id },
            ));
        }

        if let Some(&(width, height)) = image_dims.get(&annotation.image_id) {
            if x < -BOUNDS_TOLERANCE
                || y < -BOUNDS_TOLERANCE
                || x + w > width as f64 + BOUNDS_TOLERANCE
                || y + h > height as f64 + BOUNDS_TOLERANCE
            {
                report.add(ValidationIssue::warning(
                    IssueCode::BBoxOutOfBounds,
                    format!(
                        "Bounding box [{:.1}, {:.1}, {:.1}, {:.1}] extends outside image bounds (0, 0, {}, {})",
                        x, y, w, h, width, height
                    ),
                    IssueContext::Annotation { id },
                ));
            }
        }
    }
}
