use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use readalong::types::WordTiming;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn readalong() -> Command {
    let mut cmd = Command::cargo_bin("readalong").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn segment_groups_response_alignment_into_words() {
    let output = readalong()
        .arg("segment")
        .arg(fixture("speech_response.json"))
        .arg("--compact")
        .output()
        .unwrap();
    assert!(output.status.success());

    let timings: Vec<WordTiming> = serde_json::from_slice(&output.stdout).unwrap();
    let words: Vec<&str> = timings.iter().map(|t| t.word.as_str()).collect();
    assert_eq!(words, vec!["Hi", "you!"]);
    assert_eq!((timings[1].start_index, timings[1].end_index), (4, 8));
    approx::assert_abs_diff_eq!(timings[1].start_time, 0.3);
    approx::assert_abs_diff_eq!(timings[1].end_time, 0.7);
}

#[test]
fn segment_pretty_prints_camel_case_fields() {
    readalong()
        .arg("segment")
        .arg(fixture("speech_response.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"startIndex\": 0"))
        .stdout(predicate::str::contains("\"word\": \"Hi\""));
}

#[test]
fn segment_rejects_mismatched_alignment() {
    readalong()
        .arg("segment")
        .arg(fixture("mismatched_alignment.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("alignment length mismatch"));
}

#[test]
fn track_reports_active_word_per_time() {
    readalong()
        .arg("track")
        .arg(fixture("timings.json"))
        .args(["--at", "-0.5", "0.1", "0.25", "00:00.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-0.500\t-\t-"))
        .stdout(predicate::str::contains("0.100\t0\tHi"))
        .stdout(predicate::str::contains("0.250\t0\tHi"))
        .stdout(predicate::str::contains("0.900\t1\tyou!"));
}

#[test]
fn track_rejects_bad_times() {
    readalong()
        .arg("track")
        .arg(fixture("timings.json"))
        .args(["--at", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time 'soon'"));
}

#[test]
fn config_round_trips_through_data_dir() {
    let temp = tempdir().unwrap();

    readalong()
        .arg("--data-dir")
        .arg(temp.path())
        .args(["config", "set-key", "  sk_secret1234  "])
        .assert()
        .success();
    readalong()
        .arg("--data-dir")
        .arg(temp.path())
        .args(["config", "set-output", "audio"])
        .assert()
        .success();

    let raw = std::fs::read_to_string(temp.path().join("settings.json")).unwrap();
    assert!(raw.contains("\"apiKey\": \"sk_secret1234\""));

    readalong()
        .arg("--data-dir")
        .arg(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****1234"))
        .stdout(predicate::str::contains("Output folder: audio"))
        .stdout(predicate::str::contains("sk_secret").not());
}

#[test]
fn history_commands_on_empty_data_dir() {
    let temp = tempdir().unwrap();

    readalong()
        .arg("--data-dir")
        .arg(temp.path())
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history yet."));
    readalong()
        .arg("--data-dir")
        .arg(temp.path())
        .args(["history", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    readalong()
        .arg("--data-dir")
        .arg(temp.path())
        .args(["history", "delete", "tts-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("history entry not found: tts-1"));
}

#[test]
fn say_without_api_key_fails_before_any_request() {
    let temp = tempdir().unwrap();

    readalong()
        .arg("--data-dir")
        .arg(temp.path())
        .args(["say", "hello", "--no-play"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing API key"));
    assert!(!temp.path().join("output").exists());
}
