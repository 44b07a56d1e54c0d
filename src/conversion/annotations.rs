//! Annotation builder: one annotation per usable source row.
//!
//! Rows are visited in source order and never abort the run. A row is
//! dropped, with one issue reported, when:
//! - a coordinate cell is empty, non-numeric or non-finite (error)
//! - its box has `xmax <= xmin` or `ymax <= ymin` (warning)
//! - its image or label has no record in the indexes (error)

use super::categories::CategoryIndex;
use super::images::ImageIndex;
use super::report::{ConversionIssue, ConversionIssueCode, ConversionReport};
use super::reporter::Reporter;
use crate::ir::{
    Annotation, AnnotationId, AnnotationMetadata, BBoxXYXY, SourceRow, SourceTable,
};

/// Builds annotations for every row of `table`, appending one issue per
/// dropped row to `report` and forwarding it to `reporter`.
pub fn build_annotations(
    table: &SourceTable,
    categories: &CategoryIndex,
    images: &ImageIndex,
    created_at: &str,
    report: &mut ConversionReport,
    reporter: &mut dyn Reporter,
) -> Vec<Annotation> {
    let mut annotations = Vec::with_capacity(table.len());

    for row in &table.rows {
        match build_row(row, categories, images, created_at) {
            Ok(annotation) => annotations.push(annotation),
            Err(issue) => {
                reporter.issue(&issue);
                report.add(issue);
            }
        }
    }

    annotations
}

fn build_row(
    row: &SourceRow,
    categories: &CategoryIndex,
    images: &ImageIndex,
    created_at: &str,
) -> Result<Annotation, ConversionIssue> {
    let bbox = BBoxXYXY::from_xyxy(
        coordinate(row, "xmin", &row.xmin)?,
        coordinate(row, "ymin", &row.ymin)?,
        coordinate(row, "xmax", &row.xmax)?,
        coordinate(row, "ymax", &row.ymax)?,
    );

    if !bbox.has_positive_extent() {
        return Err(degenerate(row, &bbox));
    }

    let image_id = images.id_of(&row.image).ok_or_else(|| {
        ConversionIssue::error(
            ConversionIssueCode::UnresolvedImage,
            row.index,
            row.line,
            format!("no image record for '{}'", row.image),
        )
    })?;
    let category_id = categories.id_of(&row.label).ok_or_else(|| {
        ConversionIssue::error(
            ConversionIssueCode::UnresolvedCategory,
            row.index,
            row.line,
            format!("no category record for '{}'", row.label),
        )
    })?;

    Ok(Annotation {
        id: AnnotationId::for_row(&row.image, &row.label, row.index),
        image_id,
        category_id,
        bbox: bbox.to_xywh(),
        area: bbox.area(),
        segmentation: Vec::new(),
        iscrowd: 0,
        metadata: AnnotationMetadata {
            confidence: 1.0,
            created_at: created_at.to_string(),
        },
    })
}

/// Warning for a box with no positive extent; width is reported first.
fn degenerate(row: &SourceRow, bbox: &BBoxXYXY) -> ConversionIssue {
    if bbox.width() <= 0.0 {
        ConversionIssue::warning(
            ConversionIssueCode::NonPositiveWidth,
            row.index,
            row.line,
            format!(
                "invalid bbox dimensions: width {} (xmin {}, xmax {})",
                bbox.width(),
                bbox.xmin,
                bbox.xmax
            ),
        )
    } else {
        ConversionIssue::warning(
            ConversionIssueCode::NonPositiveHeight,
            row.index,
            row.line,
            format!(
                "invalid bbox dimensions: height {} (ymin {}, ymax {})",
                bbox.height(),
                bbox.ymin,
                bbox.ymax
            ),
        )
    }
}

/// Coerces one coordinate cell.
fn coordinate(row: &SourceRow, column: &str, raw: &str) -> Result<f64, ConversionIssue> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Err(ConversionIssue::error(
            ConversionIssueCode::MissingCoordinate,
            row.index,
            row.line,
            format!("missing value in column '{}'", column),
        ));
    }

    let value: f64 = cell.parse().map_err(|_| {
        ConversionIssue::error(
            ConversionIssueCode::NonNumericCoordinate,
            row.index,
            row.line,
            format!("could not convert '{}' in column '{}' to a number", cell, column),
        )
    })?;

    if !value.is_finite() {
        return Err(ConversionIssue::error(
            ConversionIssueCode::NonFiniteCoordinate,
            row.index,
            row.line,
            format!("non-finite value '{}' in column '{}'", cell, column),
        ));
    }

    Ok(value)
}
