//! Corner-pair bounding boxes and their COCO `[x, y, width, height]` form.

/// An axis-aligned bounding box in XYXY form (xmin, ymin, xmax, ymax).
///
/// Construction does not enforce `min < max`: source rows may describe
/// inverted or degenerate boxes, and the annotation builder decides what
/// to do with them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBoxXYXY {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BBoxXYXY {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Builds a box from a top-left corner and extent.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// May be negative if the box is inverted.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// May be negative if the box is inverted.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.xmin.is_finite()
            && self.ymin.is_finite()
            && self.xmax.is_finite()
            && self.ymax.is_finite()
    }

    /// Returns true if both extents are strictly positive.
    #[inline]
    pub fn has_positive_extent(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Converts to the COCO layout `[x, y, width, height]`.
    #[inline]
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.width(), self.height()]
    }
}
