//! Command-line tests against the built binary.

use std::path::Path;
use std::process::Command;

const SNOWFLAKE_VARS: [&str; 7] = [
    "SNOWFLAKE_ACCOUNT",
    "SNOWFLAKE_USER",
    "SNOWFLAKE_PASSWORD",
    "SNOWFLAKE_WAREHOUSE",
    "SNOWFLAKE_DATABASE",
    "SNOWFLAKE_SCHEMA",
    "SNOWFLAKE_ROLE",
];

/// Runs the binary in `dir` with an empty config and no Snowflake environment.
fn run_charts(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_shopsphere-charts"));
    command
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("missing.toml"))
        .args(args)
        .env_remove("RUST_LOG");
    for var in SNOWFLAKE_VARS {
        command.env_remove(var);
    }
    let output = command.output().expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

#[test]
fn test_mock_warehouse_html_only() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_charts(
        dir.path(),
        &["--mock-warehouse", "--no-images", "-o", "out"],
    );

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains("1. Regional Profitability"));
    assert!(stdout.contains("Created: churn_risk.html"));
    assert!(stdout.contains("All visualizations generated successfully!"));
    assert!(stdout.contains("Connection closed."));
    assert!(dir.path().join("out").join("product_performance.html").exists());
    assert!(!dir.path().join("out").join("product_performance.png").exists());
}

#[test]
fn test_print_sql() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_charts(
        dir.path(),
        &["--print-sql", "--schema", "REPORTING", "--only", "discount"],
    );

    assert_eq!(code, 0);
    assert!(stdout.starts_with("-- 3. Discount Impact"));
    assert!(stdout.contains("FROM REPORTING.MART_DISCOUNT_IMPACT"));
    assert!(!stdout.contains("MART_REGIONAL_PERFORMANCE"));
}

#[test]
fn test_missing_credentials_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_charts(dir.path(), &[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Missing account"), "stderr: {stderr}");
    assert!(!stdout.contains("Connecting to Snowflake"));
}

#[test]
fn test_unknown_question_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_charts(dir.path(), &["--only", "revenue"]);

    assert_eq!(code, 2);
    assert!(stderr.contains("revenue"));
}

#[test]
fn test_object_names_checked_in_every_mode() {
    let dir = tempfile::tempdir().unwrap();

    for mode in ["--print-sql", "--mock-warehouse"] {
        let (code, stdout, stderr) = run_charts(
            dir.path(),
            &[mode, "--no-images", "--schema", "MART;DROP"],
        );

        assert_eq!(code, 1, "{mode}");
        assert!(stderr.contains("Invalid schema"), "stderr: {stderr}");
        assert!(!stdout.contains("SELECT"));
        assert!(!stdout.contains("Created:"));
    }
}
