//! CLI integration tests

use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with an empty home directory and no colour
fn aqi(args: &[&str]) -> Output {
    let home = TempDir::new().expect("Failed to create temp home");
    Command::new(env!("CARGO_BIN_EXE_aqi"))
        .args(args)
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("AQI_API_URL")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = aqi(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Air Quality Index"), "Should show app name");
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("classify"), "Should show classify command");
    assert!(stdout.contains("bands"), "Should show bands command");
    assert!(stdout.contains("health"), "Should show health command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = aqi(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("aqi"), "Should show binary name");
}

/// Test predict subcommand help lists every pollutant
#[test]
fn test_predict_help() {
    let output = aqi(&["predict", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    for flag in ["--pm25", "--pm10", "--no2", "--so2", "--co", "--o3"] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

#[test]
fn test_classify_boundaries() {
    let output = aqi(&["classify", "50"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("AQI: 50.00"));
    assert!(stdout.contains("Good (Green)"));

    let output = aqi(&["classify", "50.01"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Moderate (Yellow)"));
}

#[test]
fn test_classify_negative_score() {
    let output = aqi(&["classify", "-59.08"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Negative scores are valid");
    assert!(stdout.contains("Good (Green)"));
}

#[test]
fn test_classify_json() {
    let output = aqi(&["classify", "389", "--format", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["category"], "hazardous");
    assert_eq!(json["label"], "Hazardous");
    assert_eq!(json["color"], "Maroon");
}

#[test]
fn test_bands_table() {
    let output = aqi(&["bands"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Unhealthy for Sensitive Groups"));
    assert!(stdout.contains("100 < AQI ≤ 150"));
    assert!(stdout.contains("AQI > 300"));
}

#[test]
fn test_predict_rejects_negative_before_sending() {
    let output = aqi(&["predict", "--pm10=-4", "--api-url", "http://127.0.0.1:9"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("PM10 must be at least 0.0"), "{}", stderr);
}

#[test]
fn test_predict_against_server() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"reading":{"pm25":35.0,"pm10":60.0,"no2":20.0,"so2":5.0,"co":0.8,"o3":30.0},
                "aqi":46.42,"category":"good","category_label":"Good","color":"Green"}"#,
        )
        .create();

    let url = server.url();
    let output = aqi(&[
        "predict", "--pm25", "35", "--pm10", "60", "--no2", "20", "--so2", "5", "--co", "0.8",
        "--o3", "30", "--api-url", &url,
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    mock.assert();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Predicted AQI: 46.42"));
    assert!(stdout.contains("Category: Good (Green)"));
}

#[test]
fn test_predict_reports_server_error() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/v1/predict")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Could not predict AQI: prediction failed: model produced no output","code":500}"#)
        .create();

    let url = server.url();
    let output = aqi(&["predict", "--api-url", &url]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("model produced no output"), "{}", stderr);
}
