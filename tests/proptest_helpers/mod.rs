#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use csv2coco::conversion::ConvertOptions;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const HEADER: &str = "image,label,xmin,ymin,xmax,ymax";

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn fixed_options() -> ConvertOptions {
    let at: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid timestamp");
    ConvertOptions::default().with_generated_at(at)
}

/// One generated source row, already rendered as cells.
#[derive(Clone, Debug)]
pub struct RowCells {
    pub image: String,
    pub label: String,
    pub coords: [String; 4],
}

impl RowCells {
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.image, self.label, self.coords[0], self.coords[1], self.coords[2], self.coords[3]
        )
    }
}

/// Small name pools so rows share images and labels often.
pub fn arb_image_name() -> BoxedStrategy<String> {
    prop_oneof![
        8 => (0u8..6).prop_map(|i| format!("img{i}.jpg")),
        1 => Just(String::new()),
    ]
    .boxed()
}

pub fn arb_label() -> BoxedStrategy<String> {
    prop_oneof![
        8 => prop::sample::select(vec!["fish", "coral", "crab", "Fish", "sea star"])
            .prop_map(|s| s.to_string()),
        1 => Just(String::new()),
    ]
    .boxed()
}

/// Mostly numbers; sometimes blanks, garbage or non-finite text.
pub fn arb_coord_cell() -> BoxedStrategy<String> {
    prop_oneof![
        12 => (0u32..4000).prop_map(|v| v.to_string()),
        4 => (0.0f64..4000.0).prop_map(|v| format!("{v:.3}")),
        1 => Just(String::new()),
        1 => Just("abc".to_string()),
        1 => Just("inf".to_string()),
    ]
    .boxed()
}

pub fn arb_row() -> BoxedStrategy<RowCells> {
    (
        arb_image_name(),
        arb_label(),
        proptest::array::uniform4(arb_coord_cell()),
    )
        .prop_map(|(image, label, coords)| RowCells {
            image,
            label,
            coords,
        })
        .boxed()
}

/// A full source file with 1..=max_rows data rows.
pub fn arb_source_csv(max_rows: usize) -> BoxedStrategy<(String, Vec<RowCells>)> {
    prop::collection::vec(arb_row(), 1..=max_rows)
        .prop_map(|rows| {
            let mut csv = String::from(HEADER);
            csv.push('\n');
            for row in &rows {
                csv.push_str(&row.to_line());
                csv.push('\n');
            }
            (csv, rows)
        })
        .boxed()
}
