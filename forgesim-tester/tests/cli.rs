use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "forgesim-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_forgesim-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("safe-ladder"));
}

#[test]
fn cli_runs_all_scenarios_to_json() {
    let exe = env!("CARGO_BIN_EXE_forgesim-tester");
    let output_path = temp_path("all");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "all",
            "--seeds",
            "1,0x2A",
            "--iterations",
            "2",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let results = results.as_array().expect("array of results");
    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_replays_script_with_markdown_report() {
    let exe = env!("CARGO_BIN_EXE_forgesim-tester");
    let output_path = temp_path("script");
    let output = Command::new(exe)
        .args([
            "--script",
            "buy:sword;craft:normal*3;assign:1;stone:normal;enhance;collect",
            "--iterations",
            "1",
            "--report",
            "markdown",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("# Forgesim Scenario Results"));
    assert!(content.contains("Custom Script"));
}

#[test]
fn cli_script_with_reset_passes() {
    let exe = env!("CARGO_BIN_EXE_forgesim-tester");
    let output_path = temp_path("reset");
    let output = Command::new(exe)
        .args([
            "--script",
            "buy:sword;craft:normal*2;reset;buy:bow",
            "--iterations",
            "1",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(results[0]["passed"], true);
    assert_eq!(results[0]["final_summary"]["ledger"]["money"], 1_000);
}

#[test]
fn cli_rejects_bad_script() {
    let exe = env!("CARGO_BIN_EXE_forgesim-tester");
    let output = Command::new(exe)
        .args(["--script", "buy:axe", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parsing --script"), "stderr: {stderr}");
}

#[test]
fn cli_rejects_missing_config() {
    let exe = env!("CARGO_BIN_EXE_forgesim-tester");
    let output = Command::new(exe)
        .args(["--config", "/nonexistent/forge.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loading forge configuration"));
}

#[test]
fn cli_applies_config_override() {
    let exe = env!("CARGO_BIN_EXE_forgesim-tester");
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{ "purchase_price": 7 }"#).expect("write config");
    let output_path = temp_path("config-out");
    let output = Command::new(exe)
        .args([
            "--script",
            "buy*3",
            "--iterations",
            "1",
            "--report",
            "json",
            "--config",
        ])
        .arg(&config_path)
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(results[0]["final_summary"]["ledger"]["money"], 21);
}
