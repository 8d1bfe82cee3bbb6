use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "demos-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_demos-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    for key in ["merchant", "vintner", "politician", "briber", "random"] {
        assert!(content.contains(key), "missing {key}");
    }
}

#[test]
fn cli_runs_matches_and_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_demos-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--seeds",
            "7,DM-AGORA42",
            "--players",
            "3",
            "--strategies",
            "politician,random",
            "--max-cycles",
            "15",
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
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let matches = parsed.as_array().expect("array of matches");
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().any(|m| m["code"] == "DM-AGORA42"));
    assert!(matches.iter().all(|m| m["passed"] == true));
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_demos-tester");
    let output = Command::new(exe)
        .args(["--strategies", "tyrant"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown strategy"));
}

#[test]
fn cli_rejects_unsupported_seat_count() {
    let exe = env!("CARGO_BIN_EXE_demos-tester");
    let output = Command::new(exe)
        .args(["--players", "9", "--max-cycles", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}

fn outcome_digest(report: &serde_json::Value) -> u64 {
    use std::hash::Hasher;
    let mut hasher = twox_hash::XxHash64::with_seed(0);
    for entry in report.as_array().expect("array of matches") {
        for field in ["seed", "cycles", "points", "winner", "rng_draws", "moves_rejected"] {
            hasher.write(entry[field].to_string().as_bytes());
        }
    }
    hasher.finish()
}

#[test]
fn cli_reports_are_reproducible() {
    let exe = env!("CARGO_BIN_EXE_demos-tester");
    let run = |label: &str| {
        let output_path = temp_path(label);
        let status = Command::new(exe)
            .args([
                "--seeds",
                "11,12",
                "--strategies",
                "random,vintner,briber",
                "--max-cycles",
                "10",
                "--report",
                "json",
                "--output",
            ])
            .arg(&output_path)
            .status()
            .expect("run cli");
        assert!(status.success());
        let content = std::fs::read_to_string(output_path).expect("read output");
        serde_json::from_str::<serde_json::Value>(&content).expect("json report")
    };
    assert_eq!(outcome_digest(&run("repro-a")), outcome_digest(&run("repro-b")));
}
