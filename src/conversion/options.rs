//! Per-run conversion settings.

use chrono::{Datelike, Local, NaiveDateTime};

use crate::ir::{DATE_FORMAT, TIMESTAMP_FORMAT};

/// Width written on every image record unless overridden.
pub const DEFAULT_IMAGE_WIDTH: u32 = 2704;

/// Height written on every image record unless overridden.
pub const DEFAULT_IMAGE_HEIGHT: u32 = 1524;

/// Everything a conversion needs besides the source table.
///
/// Passed explicitly into the pipeline; no stage keeps settings of its own.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Image width in pixels, identical for every image record.
    pub image_width: u32,
    /// Image height in pixels, identical for every image record.
    pub image_height: u32,
    /// Field delimiter of the source file.
    pub delimiter: u8,
    /// The one timestamp stamped into every dated field of the document.
    pub generated_at: NaiveDateTime,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
            delimiter: b',',
            generated_at: Local::now().naive_local(),
        }
    }
}

impl ConvertOptions {
    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Pins the run timestamp, making the whole document reproducible.
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub(crate) fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub(crate) fn date(&self) -> String {
        self.generated_at.format(DATE_FORMAT).to_string()
    }

    pub(crate) fn year(&self) -> i32 {
        self.generated_at.year()
    }
}
