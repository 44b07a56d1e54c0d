use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn csv2coco() -> Command {
    let mut cmd = Command::cargo_bin("csv2coco").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("CSV2COCO_IMAGE_WIDTH")
        .env_remove("CSV2COCO_IMAGE_HEIGHT");
    cmd
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("read output");
    serde_json::from_str(&text).expect("output is JSON")
}

#[test]
fn runs() {
    csv2coco().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = csv2coco();
    cmd.arg("-V");
    cmd.assert().success().stdout("csv2coco 0.1.0\n");
}

// Convert subcommand tests

#[test]
fn convert_valid_csv_writes_document() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("out/nested/annotations.json");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/sample_valid.csv", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted sample_valid.csv (5 rows)"))
        .stdout(predicate::str::contains(
            "2 images, 3 categories, 5 annotations",
        ));

    let doc = read_json(&output);
    for key in ["info", "licenses", "images", "annotations", "categories"] {
        assert!(doc.get(key).is_some(), "missing top-level key {key}");
    }
    assert_eq!(doc["info"]["source"], "sample_valid.csv");
    assert_eq!(doc["licenses"][0]["id"], 1);

    let names: Vec<&str> = doc["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["coral", "crab", "fish"]);

    let first = &doc["annotations"][0];
    assert_eq!(first["id"], 2_415_765_361u64);
    assert_eq!(first["image_id"], 4_799_295u64);
    assert_eq!(first["category_id"], 2_212_800_874u64);
    assert_eq!(first["bbox"], serde_json::json!([10.0, 10.0, 40.0, 30.0]));
    assert_eq!(first["area"], 1200.0);
}

#[test]
fn convert_reports_dropped_rows_and_still_saves() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/sample_dirty.csv", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dropped 4 row(s): 3 error(s), 1 warning(s)",
        ))
        .stdout(predicate::str::contains("row 2 (line 3)"));

    let doc = read_json(&output);
    assert_eq!(doc["annotations"].as_array().unwrap().len(), 2);
    assert_eq!(doc["images"].as_array().unwrap().len(), 2);
    assert_eq!(doc["categories"].as_array().unwrap().len(), 3);
}

#[test]
fn convert_strict_fails_after_saving() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args([
            "--no-log-file",
            "convert",
            "tests/fixtures/sample_dirty.csv",
            "--strict",
            "-o",
        ])
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("4 of 6 row(s) were dropped"));

    assert!(output.exists());
}

#[test]
fn convert_json_report_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args([
            "--no-log-file",
            "convert",
            "tests/fixtures/sample_dirty.csv",
            "--report",
            "json",
            "-o",
        ])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rows\": 6"))
        .stdout(predicate::str::contains("\"annotations\": 2"))
        .stdout(predicate::str::contains("\"code\": \"non_numeric_coordinate\""))
        .stdout(predicate::str::contains("\"code\": \"non_positive_width\""))
        .stdout(predicate::str::contains("\"code\": \"unresolved_image\""));
}

#[test]
fn convert_missing_column_fails_without_output() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/missing_label.csv", "-o"])
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing required column(s)"))
        .stderr(predicate::str::contains("label"));

    assert!(!output.exists());
}

#[test]
fn convert_header_only_fails_without_output() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/header_only.csv", "-o"])
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has no data rows"));

    assert!(!output.exists());
}

#[test]
fn convert_nonexistent_input_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");

    csv2coco()
        .args(["--no-log-file", "convert", "nonexistent_file.csv", "-o"])
        .arg(temp.path().join("annotations.json"))
        .assert()
        .code(1);
}

#[test]
fn convert_unwritable_output_exits_with_save_status() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "occupied").expect("write blocker");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/sample_valid.csv", "-o"])
        .arg(blocker.join("annotations.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to write COCO JSON"));
}

#[test]
fn convert_custom_delimiter() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args([
            "--no-log-file",
            "convert",
            "tests/fixtures/semicolon.csv",
            "--delimiter",
            ";",
            "-o",
        ])
        .arg(&output)
        .assert()
        .success();

    assert_eq!(read_json(&output)["annotations"].as_array().unwrap().len(), 1);
}

#[test]
fn convert_image_size_from_env_and_flags() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .env("CSV2COCO_IMAGE_WIDTH", "640")
        .args([
            "--no-log-file",
            "convert",
            "tests/fixtures/sample_valid.csv",
            "--image-height",
            "480",
            "-o",
        ])
        .arg(&output)
        .assert()
        .success();

    let doc = read_json(&output);
    for image in doc["images"].as_array().unwrap() {
        assert_eq!(image["width"], 640);
        assert_eq!(image["height"], 480);
    }
}

#[test]
fn convert_default_image_size() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/sample_valid.csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    let doc = read_json(&output);
    assert_eq!(doc["images"][0]["width"], 2704);
    assert_eq!(doc["images"][0]["height"], 1524);
}

#[test]
fn convert_rejects_zero_image_width() {
    csv2coco()
        .args([
            "--no-log-file",
            "convert",
            "tests/fixtures/sample_valid.csv",
            "--image-width",
            "0",
        ])
        .assert()
        .failure();
}

#[test]
fn convert_appends_to_log_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let log = temp.path().join("logs/conversion.log");
    let output = temp.path().join("annotations.json");

    for _ in 0..2 {
        csv2coco()
            .arg("--log-file")
            .arg(&log)
            .args(["convert", "tests/fixtures/sample_dirty.csv", "-o"])
            .arg(&output)
            .assert()
            .success();
    }

    let text = fs::read_to_string(&log).expect("read log file");
    assert_eq!(text.matches("Saved COCO document").count(), 2);
    assert!(text.contains("could not convert 'abc' in column 'xmin' to a number"));
}

#[test]
fn quiet_suppresses_info_on_console() {
    let temp = tempfile::tempdir().expect("create temp dir");

    csv2coco()
        .args([
            "--no-log-file",
            "--quiet",
            "convert",
            "tests/fixtures/sample_valid.csv",
            "-o",
        ])
        .arg(temp.path().join("annotations.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved COCO document").not());
}

// Validate subcommand tests

#[test]
fn validate_converted_document_passes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/sample_valid.csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    csv2coco()
        .args(["--no-log-file", "validate"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation passed"));
}

#[test]
fn validate_invalid_document_fails() {
    csv2coco()
        .args([
            "--no-log-file",
            "validate",
            "tests/fixtures/sample_invalid.coco.json",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("DuplicateImageId"))
        .stdout(predicate::str::contains("MissingImageRef"))
        .stdout(predicate::str::contains("MissingCategoryRef"));
}

#[test]
fn validate_json_output_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("annotations.json");

    csv2coco()
        .args(["--no-log-file", "convert", "tests/fixtures/sample_valid.csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    csv2coco()
        .args(["--no-log-file", "validate", "--output", "json"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"error_count\": 0"))
        .stdout(predicate::str::contains("\"warning_count\": 0"));
}

#[test]
fn validate_nonexistent_file_fails() {
    csv2coco()
        .args(["--no-log-file", "validate", "nonexistent_file.json"])
        .assert()
        .failure();
}
