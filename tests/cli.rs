use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CROPS: &str = r#"[
  {"Cropname": "Ragi", "District": "Tumkur", "Area": 1200},
  {"Cropname": "Paddy", "District": "Mandya", "Area": 900},
  {"Cropname": "Finger millet (RAGI)", "District": "Hassan", "Area": 300}
]"#;

fn cropfilter(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cropfilter").unwrap();
    cmd.arg(root).env_remove("RUST_LOG");
    cmd
}

#[test]
fn filters_matching_records_into_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("karnataka.json"), CROPS).unwrap();

    cropfilter(temp_dir.path())
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WRITTEN:"));

    let output = fs::read_to_string(
        temp_dir
            .path()
            .join("ProcessedJSON")
            .join("Process_karnataka.json"),
    )
    .unwrap();

    let expected = "[\n  {\n    \"Cropname\": \"Ragi\",\n    \"District\": \"Tumkur\",\n    \"Area\": 1200\n  },\n  {\n    \"Cropname\": \"Finger millet (RAGI)\",\n    \"District\": \"Hassan\",\n    \"Area\": 300\n  }\n]";
    assert_eq!(output, expected);
}

#[test]
fn rerun_produces_identical_bytes() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("crops.json"), CROPS).unwrap();
    let output_path = temp_dir.path().join("ProcessedJSON").join("Process_crops.json");

    cropfilter(temp_dir.path()).arg("-q").assert().success();
    let first = fs::read(&output_path).unwrap();

    cropfilter(temp_dir.path()).arg("-q").assert().success();
    let second = fs::read(&output_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn skips_files_with_other_extensions() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "ragi everywhere").unwrap();

    cropfilter(temp_dir.path())
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIPPED:").and(predicate::str::contains("notes.txt")));

    assert!(!temp_dir
        .path()
        .join("ProcessedJSON")
        .join("Process_notes.txt")
        .exists());
}

#[test]
fn malformed_file_does_not_stop_the_batch() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a_broken.json"), "[{\"Cropname\": ").unwrap();
    fs::write(temp_dir.path().join("b_valid.json"), CROPS).unwrap();

    cropfilter(temp_dir.path())
        .args(["--output-format", "plain"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("a_broken.json"));

    let output_dir = temp_dir.path().join("ProcessedJSON");
    assert!(output_dir.join("Process_b_valid.json").exists());
    assert!(!output_dir.join("Process_a_broken.json").exists());
}

#[test]
fn keyword_and_field_can_be_changed() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("crops.json"),
        r#"[{"crop": "Jowar"}, {"crop": "Ragi"}]"#,
    )
    .unwrap();

    cropfilter(temp_dir.path())
        .args(["--field", "crop", "--keyword", "JOW", "--prefix", "Jowar", "-q"])
        .assert()
        .success();

    let output = fs::read_to_string(
        temp_dir
            .path()
            .join("ProcessedJSON")
            .join("Jowar_crops.json"),
    )
    .unwrap();
    assert_eq!(output, "[\n  {\n    \"crop\": \"Jowar\"\n  }\n]");
}

#[test]
fn dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("crops.json"), CROPS).unwrap();

    cropfilter(temp_dir.path())
        .args(["--dry-run", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Process_crops.json"));

    assert!(!temp_dir.path().join("ProcessedJSON").exists());
}

#[test]
fn missing_root_is_fatal() {
    let temp_dir = TempDir::new().unwrap();

    cropfilter(&temp_dir.path().join("does-not-exist"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Cannot read directory"));
}

#[test]
fn invalid_keyword_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();

    cropfilter(temp_dir.path())
        .args(["--keyword", ""])
        .assert()
        .code(5);
}

#[test]
fn output_directory_inside_scan_root_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.json"), CROPS).unwrap();

    for output_dir in [".", ".."] {
        cropfilter(temp_dir.path())
            .args(["--output-dir", output_dir])
            .assert()
            .code(5);
    }

    assert!(!temp_dir.path().join("Process_a.json").exists());
}

#[test]
fn json_output_ends_with_summary() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("crops.json"), CROPS).unwrap();

    let assert = cropfilter(temp_dir.path())
        .args(["--output-format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let last_line = stdout.lines().last().unwrap();
    let summary: serde_json::Value = serde_json::from_str(last_line).unwrap();

    assert_eq!(summary["type"], "summary");
    assert_eq!(summary["counts"]["processed"], 1);
    assert_eq!(summary["processed"][0]["records_matched"], 2);
}

#[test]
fn generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("cropfilter.toml");

    Command::cargo_bin("cropfilter")
        .unwrap()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("keyword = \"ragi\""));
}
