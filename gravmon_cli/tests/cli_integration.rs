use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;

fn gravmon() -> Command {
    Command::cargo_bin("gravmon").expect("binary built")
}

#[test]
fn monitor_streams_fixed_point_lines() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let assert = gravmon()
        .current_dir(tmp.path())
        .args(["monitor", "--duration-s", "0.4", "--fps", "100"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(
        lines.len() >= 5,
        "expected a stream of readings, got {} lines",
        lines.len()
    );
    for line in lines {
        assert!(
            line.starts_with('+') || line.starts_with('-'),
            "reading not sign-prefixed: {line:?}"
        );
        let value: f64 = line.parse().expect("reading parses as a float");
        assert!(value.abs() < 2.0, "implausible reading: {value}");
    }
}

#[test]
fn monitor_json_lines_parse() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let assert = gravmon()
        .current_dir(tmp.path())
        .args(["--json", "monitor", "--duration-s", "0.4", "--fps", "100"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let mut readings = 0usize;
    let mut saw_summary = false;
    for line in stdout.lines() {
        let value: serde_json::Value = serde_json::from_str(line).expect("JSON line");
        if value.get("vertical_accel_g").is_some() {
            readings += 1;
        } else if value.get("event").and_then(|e| e.as_str()) == Some("summary") {
            saw_summary = true;
            assert!(value.get("processed").is_some());
            assert!(value.get("dropped").is_some());
        }
    }
    assert!(readings >= 5, "expected JSON readings, got {readings}");
    assert!(saw_summary, "missing summary line");
}

#[test]
fn monitor_respects_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config_path = tmp.path().join("gravmon.toml");
    let mut f = File::create(&config_path).expect("create config");
    f.write_all(b"[sampler]\nfps = 100\n\n[filter]\nwindow = 4\n")
        .expect("write config");

    gravmon()
        .current_dir(tmp.path())
        .args([
            "--config",
            config_path.to_str().expect("utf8 path"),
            "monitor",
            "--duration-s",
            "0.3",
        ])
        .assert()
        .success();
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config_path = tmp.path().join("bad.toml");
    let mut f = File::create(&config_path).expect("create config");
    f.write_all(b"[sampler]\nfps = 0\n").expect("write config");

    gravmon()
        .current_dir(tmp.path())
        .args([
            "--config",
            config_path.to_str().expect("utf8 path"),
            "monitor",
            "--duration-s",
            "0.1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sampler.fps"));
}

#[test]
fn replay_streams_the_trace() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let trace_path = tmp.path().join("trace.csv");
    let mut f = File::create(&trace_path).expect("create trace");
    // Projection of each row is -0.5: gravity (0,0,-1) against az 0.5.
    f.write_all(
        b"t_s,gx,gy,gz,ax,ay,az\n\
          0.00,0.0,0.0,-1.0,0.0,0.0,0.5\n\
          0.01,0.0,0.0,-1.0,0.0,0.0,0.5\n\
          0.02,0.0,0.0,-1.0,0.0,0.0,0.5\n\
          0.03,0.0,0.0,-1.0,0.0,0.0,0.5\n",
    )
    .expect("write trace");

    let assert = gravmon()
        .current_dir(tmp.path())
        .args([
            "replay",
            trace_path.to_str().expect("utf8 path"),
            "--fps",
            "100",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert!(
        stdout.lines().any(|l| l == "-0.50"),
        "expected -0.50 readings, got: {stdout:?}"
    );
}

#[test]
fn replay_missing_trace_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    gravmon()
        .current_dir(tmp.path())
        .args(["replay", "definitely_missing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("open trace CSV"));
}

#[test]
fn unknown_subcommand_fails() {
    gravmon().arg("levitate").assert().failure();
}
