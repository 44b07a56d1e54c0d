//! Fuzz target for COCO JSON reading and validation.
//!
//! Run with:
//!   cargo +nightly fuzz run coco_json_parse

#![no_main]

use csv2coco::ir::io_coco_json::from_coco_slice;
use csv2coco::validation::{validate_document, ValidateOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 10MB is generous for an annotation file.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(document) = from_coco_slice(data) {
        let _ = validate_document(&document, &ValidateOptions::default());
    }
});
