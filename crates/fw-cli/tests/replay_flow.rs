//! End-to-end integration tests for the complete tracking flow.
//!
//! Tests the full pipeline: replay → persist → report.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn fw_binary() -> String {
    env!("CARGO_BIN_EXE_fw").to_string()
}

/// Writes a config file pointing the data dir into the temp directory.
/// A sustain window of 1 keeps scenario fixtures compact.
fn write_config(temp: &Path, min_sustain: u32) -> PathBuf {
    let data_dir = temp.join("data");
    let config_file = temp.join("config.toml");
    std::fs::write(
        &config_file,
        format!(
            "data_dir = \"{}\"\n\n[tracker]\nmin_sustain_samples = {min_sustain}\n",
            data_dir.display()
        ),
    )
    .unwrap();
    config_file
}

/// One observation JSONL line at `seconds` past a fixed session start.
fn obs_line(seconds: i64, label: &str) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!(
        r#"{{"timestamp":"2026-02-03T09:{minutes:02}:{secs:02}Z","label":"{label}","confidence":0.95}}"#
    )
}

/// Returns the single persisted session document under the data dir.
fn persisted_session(temp: &Path) -> serde_json::Value {
    let sessions_dir = temp.join("data/sessions");
    let mut entries: Vec<_> = std::fs::read_dir(&sessions_dir)
        .expect("sessions dir should exist")
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one session document");
    let path = entries.pop().unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_replay_persists_consolidated_session() {
    let temp = TempDir::new().unwrap();
    let config_file = write_config(temp.path(), 1);

    // present[0,10) away[10,40) present[40,50), last observation at t=50.
    let mut lines: Vec<String> = Vec::new();
    for s in (0..10).step_by(3) {
        lines.push(obs_line(s, "present"));
    }
    for s in (10..40).step_by(3) {
        lines.push(obs_line(s, "away"));
    }
    for s in (40..50).step_by(3) {
        lines.push(obs_line(s, "present"));
    }
    lines.push(obs_line(50, "present"));

    let input = temp.path().join("observations.jsonl");
    std::fs::write(&input, lines.join("\n")).unwrap();

    let output = Command::new(fw_binary())
        .arg("--config")
        .arg(&config_file)
        .arg("replay")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "replay should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let session = persisted_session(temp.path());
    let intervals = session["intervals"].as_array().unwrap();
    assert_eq!(intervals.len(), 3, "three consolidated intervals");
    assert_eq!(intervals[0]["label"], "present");
    assert_eq!(intervals[1]["label"], "away");
    assert_eq!(intervals[2]["label"], "present");
    assert_eq!(intervals[1]["start"], "2026-02-03T09:00:10Z");
    assert_eq!(session["started_at"], "2026-02-03T09:00:00Z");
    assert_eq!(session["ended_at"], "2026-02-03T09:00:50Z");
}

#[test]
fn test_report_totals_match_session() {
    let temp = TempDir::new().unwrap();
    let config_file = write_config(temp.path(), 1);

    let lines = [
        obs_line(0, "present"),
        obs_line(10, "away"),
        obs_line(40, "present"),
        obs_line(50, "present"),
    ];
    let input = temp.path().join("observations.jsonl");
    std::fs::write(&input, lines.join("\n")).unwrap();

    let output = Command::new(fw_binary())
        .arg("--config")
        .arg(&config_file)
        .arg("replay")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let sessions_dir = temp.path().join("data/sessions");
    let session_file = std::fs::read_dir(&sessions_dir)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();

    let report_output = Command::new(fw_binary())
        .arg("report")
        .arg("--session")
        .arg(&session_file)
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        report_output.status.success(),
        "report should succeed: {}",
        String::from_utf8_lossy(&report_output.stderr)
    );

    let report: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&report_output.stdout)).unwrap();
    assert_eq!(report["total_ms"], 50_000);
    assert_eq!(report["per_label_ms"]["present"], 20_000);
    assert_eq!(report["per_label_ms"]["away"], 30_000);
    let ratio = report["focus_ratio"].as_f64().unwrap();
    assert!((ratio - 0.4).abs() < 1e-9, "focus ratio should be 0.4: {ratio}");

    // Human-readable variant renders the same totals.
    let text_output = Command::new(fw_binary())
        .arg("report")
        .arg("--session")
        .arg(&session_file)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&text_output.stdout);
    assert!(stdout.contains("Focus rate:    40%"), "stdout: {stdout}");
}

#[test]
fn test_spurious_flip_is_debounced() {
    let temp = TempDir::new().unwrap();
    // Sustain window of 2 samples.
    let config_file = write_config(temp.path(), 2);

    let lines = [
        obs_line(0, "present"),
        obs_line(3, "present"),
        obs_line(6, "gadget_suspected"), // single spurious sample
        obs_line(9, "present"),
        obs_line(12, "present"),
    ];
    let input = temp.path().join("observations.jsonl");
    std::fs::write(&input, lines.join("\n")).unwrap();

    let output = Command::new(fw_binary())
        .arg("--config")
        .arg(&config_file)
        .arg("replay")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let session = persisted_session(temp.path());
    let intervals = session["intervals"].as_array().unwrap();
    assert_eq!(intervals.len(), 1, "single unbroken present interval");
    assert_eq!(intervals[0]["label"], "present");
}

#[test]
fn test_replay_fires_staged_alerts() {
    let temp = TempDir::new().unwrap();
    let config_file = write_config(temp.path(), 1);

    // Away from t=0 through t=130: all three default stages should fire.
    let mut lines = vec![];
    for s in (0..=130).step_by(3) {
        lines.push(obs_line(s, "away"));
    }
    let input = temp.path().join("observations.jsonl");
    std::fs::write(&input, lines.join("\n")).unwrap();

    let output = Command::new(fw_binary())
        .arg("--config")
        .arg(&config_file)
        .arg("replay")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("We noticed you stepped away!"), "stderr: {stderr}");
    assert!(stderr.contains("We are waiting for you :)"), "stderr: {stderr}");
    assert!(stderr.contains("Don't forget to come back ;)"), "stderr: {stderr}");
}

#[test]
fn test_malformed_and_out_of_order_lines_tolerated() {
    let temp = TempDir::new().unwrap();
    let config_file = write_config(temp.path(), 1);

    let lines = [
        obs_line(0, "present"),
        "not valid json".to_string(),
        r#"{"also":"incomplete"#.to_string(),
        obs_line(20, "present"),
        obs_line(10, "away"), // out of order: dropped
        obs_line(30, "present"),
    ];
    let input = temp.path().join("observations.jsonl");
    std::fs::write(&input, lines.join("\n")).unwrap();

    let output = Command::new(fw_binary())
        .arg("--config")
        .arg(&config_file)
        .arg("replay")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "replay should survive bad lines: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let session = persisted_session(temp.path());
    let intervals = session["intervals"].as_array().unwrap();
    assert_eq!(intervals.len(), 1, "dropped line must not split the interval");
    assert_eq!(session["ended_at"], "2026-02-03T09:00:30Z");
}

#[test]
fn test_replay_empty_input_records_nothing() {
    let temp = TempDir::new().unwrap();
    let config_file = write_config(temp.path(), 1);

    let input = temp.path().join("observations.jsonl");
    std::fs::write(&input, "").unwrap();

    let output = Command::new(fw_binary())
        .arg("--config")
        .arg(&config_file)
        .arg("replay")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nothing recorded"), "stdout: {stdout}");
    assert!(
        !temp.path().join("data/sessions").exists(),
        "no session document should be written"
    );
}

#[test]
fn test_track_reads_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let temp = TempDir::new().unwrap();
    let config_file = write_config(temp.path(), 1);

    let mut child = Command::new(fw_binary())
        .arg("--config")
        .arg(&config_file)
        .arg("track")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let stdin = child.stdin.as_mut().unwrap();
        stdin
            .write_all(format!("{}\n{}\n", obs_line(0, "present"), obs_line(5, "away")).as_bytes())
            .unwrap();
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "track should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("recorded"), "stdout: {stdout}");
    let session = persisted_session(temp.path());
    assert_eq!(session["intervals"].as_array().unwrap().len(), 2);
}

#[test]
fn test_report_missing_session_fails() {
    let temp = TempDir::new().unwrap();
    let output = Command::new(fw_binary())
        .arg("report")
        .arg("--session")
        .arg(temp.path().join("missing.json"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}
