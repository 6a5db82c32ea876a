use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/products.csv")
}

/// Runs the binary against a throwaway config so a user's own config never leaks in.
fn run(dir: &TempDir, config_yaml: &str, args: &[&str]) -> Output {
    let config = dir.path().join("config.yaml");
    fs::write(&config, config_yaml).expect("write config");
    Command::new(env!("CARGO_BIN_EXE_ecoscore"))
        .arg("-c")
        .arg(&config)
        .args(args)
        .env("HOME", dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("run ecoscore binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_default_command_compares_and_prints_picks() {
    let dir = TempDir::new().unwrap();
    let data = fixture();
    let output = run(&dir, "{}\n", &["--data", data.to_str().unwrap()]);

    assert!(output.status.success(), "expected success, stderr={}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Best EcoScore"), "stdout={}", out);
    assert!(out.contains("Lowest carbon"), "stdout={}", out);
    assert!(out.contains("Best value"), "stdout={}", out);
}

#[test]
fn test_missing_dataset_file_exits_with_load_code() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");
    let output = run(&dir, "{}\n", &["--data", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("Load error"));
}

#[test]
fn test_no_dataset_configured_exits_with_load_code() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, "{}\n", &["categories"]);
    assert_eq!(output.status.code(), Some(2), "stderr={}", stderr(&output));
}

#[test]
fn test_unrecognised_columns_exit_with_schema_code() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("books.csv");
    fs::write(&csv, "title,cost\nDune,9.99\n").unwrap();
    let output = run(&dir, "{}\n", &["--data", csv.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(3), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("Schema error"));
}

#[test]
fn test_invalid_config_values_exit_with_config_code() {
    let dir = TempDir::new().unwrap();
    let data = fixture();
    let output = run(
        &dir,
        "scoring:\n  carbon_ceiling: -1\n",
        &["--data", data.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(4), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("Config errors"));
}

#[test]
fn test_unknown_config_key_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let data = fixture();
    let output = run(&dir, "colour: always\n", &["--data", data.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4), "stderr={}", stderr(&output));
}

#[test]
fn test_whatif_tweak_out_of_range_exits_with_usage_code() {
    let dir = TempDir::new().unwrap();
    let data = fixture();
    let output = run(
        &dir,
        "{}\n",
        &[
            "--data",
            data.to_str().unwrap(),
            "whatif",
            "-p",
            "Leaf Shampoo Bar",
            "--tweak",
            "3",
        ],
    );

    assert_eq!(output.status.code(), Some(1), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("Invalid what-if"));
}

#[test]
fn test_whatif_unknown_product_exits_with_usage_code() {
    let dir = TempDir::new().unwrap();
    let data = fixture();
    let output = run(
        &dir,
        "{}\n",
        &["--data", data.to_str().unwrap(), "whatif", "-p", "Nothing Like It"],
    );
    assert_eq!(output.status.code(), Some(1), "stderr={}", stderr(&output));
}

#[test]
fn test_data_flag_overrides_configured_dataset() {
    let dir = TempDir::new().unwrap();
    let data = fixture();
    let config = format!("dataset: {}\n", dir.path().join("gone.csv").display());
    let output = run(&dir, &config, &["--data", data.to_str().unwrap(), "categories"]);

    assert!(output.status.success(), "expected success, stderr={}", stderr(&output));
    assert!(stdout(&output).contains("Personal Care"));
}

#[test]
fn test_configured_dataset_used_without_data_flag() {
    let dir = TempDir::new().unwrap();
    let config = format!("dataset: {}\n", fixture().display());
    let output = run(&dir, &config, &["categories"]);

    assert!(output.status.success(), "expected success, stderr={}", stderr(&output));
    assert!(stdout(&output).contains("Home"));
}

#[test]
fn test_piped_log_output_has_no_ansi_codes() {
    let dir = TempDir::new().unwrap();
    let data = fixture();
    // The fixture's unnamed row is skipped with a warning
    let output = run(&dir, "{}\n", &["--data", data.to_str().unwrap(), "categories"]);

    assert!(output.status.success(), "expected success, stderr={}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("skipped row"), "stderr={}", err);
    assert!(!err.contains('\u{1b}'), "stderr={:?}", err);
}
