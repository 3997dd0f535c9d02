#![cfg(feature = "cli")]

use std::process::{Command, Output};
use tempfile::TempDir;

fn run(bin: &str, dir: &TempDir, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn dep_analyzer(dir: &TempDir, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_dep-analyzer"), dir, args)
}

fn lcom_table(dir: &TempDir, args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_lcom-table"), dir, args)
}

#[test]
fn test_missing_argument_prints_usage_and_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let output = dep_analyzer(&temp_dir, &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
}

#[test]
fn test_truncated_json_exits_1_with_preview() {
    let temp_dir = TempDir::new().unwrap();
    let garbage = format!("{{\"a\": {{\"imports\": [{}", "\"x\", ".repeat(200));
    std::fs::write(temp_dir.path().join("bad.json"), &garbage).unwrap();

    let output = dep_analyzer(&temp_dir, &["bad.json", "--no-plot"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Error decoding JSON:"));
    assert!(stdout.contains("The file might not be valid JSON. Here are the first few lines:"));
    let preview = stdout.lines().last().unwrap();
    assert_eq!(preview.chars().count(), 500);
    assert!(garbage.starts_with(preview));
}

#[test]
fn test_top_level_array_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("deps.json"), r#"["a", "b"]"#).unwrap();

    let output = dep_analyzer(&temp_dir, &["deps.json", "--no-plot"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_valid_input_prints_report_and_exits_0() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("deps.json"),
        r#"{"app": {"imports": ["core"]}, "core": {}}"#,
    )
    .unwrap();

    let output = dep_analyzer(&temp_dir, &["deps.json", "--no-plot", "--seed", "1"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("==== Module Fan-in and Fan-out Analysis ===="));
    assert!(stdout.contains("==== Dependency Impact Assessment ===="));
}

#[test]
fn test_lcom_report_lists_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("lo");
    std::fs::create_dir_all(&output_dir).unwrap();
    std::fs::write(
        output_dir.join("TypeMetrics.csv"),
        "Package Name,Type Name,LCOM1,LCOM5\np,A,3,0.2\np,B,9,0.8\n",
    )
    .unwrap();

    let output = run(
        env!("CARGO_BIN_EXE_lcom-report"),
        &temp_dir,
        &["lo", "--no-charts"],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Files in output directory:\n- TypeMetrics.csv\n"));
    assert!(!stdout.contains("Found CSV file:"));
    assert!(temp_dir.path().join("lcom_results.csv").exists());
}

#[test]
fn test_lcom_table_missing_column_is_not_reported_as_read_failure() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("results.csv"), "ClassName,LCOM5\np.A,0.5\n").unwrap();

    let output = lcom_table(&temp_dir, &["results.csv", "."]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not build the LCOM table from results.csv"));
    assert!(stderr.contains("LCOM1"));
    assert!(!stderr.contains("Could not read"));
}

#[test]
fn test_lcom_table_missing_file_is_read_failure() {
    let temp_dir = TempDir::new().unwrap();
    let output = lcom_table(&temp_dir, &["missing.csv", "."]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not read missing.csv"));
}
