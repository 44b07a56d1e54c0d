//! Fuzz target for source CSV loading and conversion.
//!
//! Arbitrary bytes go through the loader; anything it accepts is converted
//! and serialized, so the row builders see hostile cells too.
//!
//! Run with:
//!   cargo +nightly fuzz run source_csv_parse

#![no_main]

use csv2coco::conversion::{convert_table, ConvertOptions};
use csv2coco::ir::io_coco_json::to_coco_string;
use csv2coco::ir::io_source_csv::from_source_csv_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(table) = from_source_csv_slice(data, b',') else {
        return;
    };
    let mut issues: Vec<csv2coco::conversion::ConversionIssue> = Vec::new();
    let outcome = convert_table(&table, &ConvertOptions::default(), &mut issues);
    let _ = to_coco_string(&outcome.document);
});
