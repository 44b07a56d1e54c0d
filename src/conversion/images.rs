//! Image indexer: one image record per distinct file name.

use std::collections::HashMap;

use super::{tally, ConvertOptions};
use crate::ir::{Image, ImageId, ImageMetadata, LicenseId, SourceTable};

/// Image records sorted by file name, plus the name -> id lookup.
#[derive(Clone, Debug, Default)]
pub struct ImageIndex {
    images: Vec<Image>,
    ids: HashMap<String, ImageId>,
}

impl ImageIndex {
    /// Indexes every non-blank image name of `table`.
    ///
    /// Dimensions come from `options`, not from the data. Images whose rows
    /// are all dropped later are still listed.
    pub fn build(table: &SourceTable, options: &ConvertOptions) -> Self {
        let counts = tally(&table.rows, |row| row.image.as_str());
        let date_captured = options.date();
        let processed_at = options.timestamp();

        let mut ids = HashMap::with_capacity(counts.len());
        let images = counts
            .into_iter()
            .map(|(file_name, object_count)| {
                let id = ImageId::for_file_name(file_name);
                ids.insert(file_name.to_string(), id);
                Image {
                    id,
                    license: LicenseId::new(1),
                    file_name: file_name.to_string(),
                    height: options.image_height,
                    width: options.image_width,
                    date_captured: date_captured.clone(),
                    metadata: ImageMetadata {
                        object_count,
                        processed_at: processed_at.clone(),
                    },
                }
            })
            .collect();

        Self { images, ids }
    }

    pub fn id_of(&self, file_name: &str) -> Option<ImageId> {
        self.ids.get(file_name).copied()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn into_images(self) -> Vec<Image> {
        self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::io_source_csv::from_source_csv_str;
    use chrono::NaiveDate;

    fn options() -> ConvertOptions {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        ConvertOptions::default()
            .with_image_size(640, 480)
            .with_generated_at(at)
    }

    #[test]
    fn test_images_sorted_with_fixed_dimensions() {
        let table = from_source_csv_str(
            "image,label,xmin,ymin,xmax,ymax\n\
             b.jpg,fish,0,0,1,1\n\
             a.jpg,fish,0,0,1,1\n\
             b.jpg,crab,0,0,1,1\n",
        )
        .unwrap();
        let index = ImageIndex::build(&table, &options());

        let images = index.into_images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].file_name, "a.jpg");
        assert_eq!(images[0].metadata.object_count, 1);
        assert_eq!(images[1].file_name, "b.jpg");
        assert_eq!(images[1].metadata.object_count, 2);
        assert!(images.iter().all(|i| i.width == 640 && i.height == 480));
        assert_eq!(images[0].id.as_u64(), 960_911_721);
        assert_eq!(images[1].id.as_u64(), 4_021_262_555);
        assert_eq!(images[0].date_captured, "2024-06-01");
        assert_eq!(images[0].metadata.processed_at, "2024-06-01 12:00:00");
        assert_eq!(images[0].license, LicenseId::new(1));
    }

    #[test]
    fn test_lookup() {
        let table =
            from_source_csv_str("image,label,xmin,ymin,xmax,ymax\nimg1.jpg,fish,0,0,1,1\n").unwrap();
        let index = ImageIndex::build(&table, &options());

        assert_eq!(index.id_of("img1.jpg"), Some(ImageId::new(4_799_295)));
        assert_eq!(index.id_of("img2.jpg"), None);
    }
}
