use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("playtogether").expect("binary is built");
    cmd.env_remove("FIVETOOLS_DATA_PATH")
        .env_remove("STRIP_FORMATTING_TAGS")
        .env_remove("RUST_LOG");
    cmd
}

fn creature(name: &str, cr: &str, environment: &[&str]) -> serde_json::Value {
    json!({
        "name": name,
        "source": "MM",
        "str": 10, "dex": 12, "con": 10, "int": 10, "wis": 10, "cha": 10,
        "cr": cr,
        "environment": environment,
        "action": [{"name": "Claw", "entries": ["{@atk mw} {@hit 3} to hit."]}]
    })
}

fn checkout() -> TempDir {
    let root = TempDir::new().expect("tempdir");
    let bestiary = root.path().join("data").join("bestiary");
    fs::create_dir_all(&bestiary).expect("mkdir");
    write(
        &bestiary,
        "bestiary-mm.json",
        &json!({"monster": [
            creature("Goblin", "1/4", &["forest", "hill"]),
            creature("Owlbear", "3", &["forest"]),
            creature("Yeti", "3", &["arctic"])
        ]}),
    );
    write(
        &bestiary,
        "legendarygroups.json",
        &json!({"legendaryGroup": [{"name": "Yeti", "source": "MM", "lairActions": ["Snow falls."]}]}),
    );
    root
}

fn write(dir: &Path, name: &str, value: &serde_json::Value) {
    fs::write(dir.join(name), value.to_string()).expect("write fixture");
}

#[test]
fn setup_reports_counts() {
    let root = checkout();
    cmd()
        .arg("setup")
        .arg("--source")
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("imported 3 monsters, 1 legendary groups, 0 diagnostics"));
}

#[test]
fn setup_json_lists_monsters() {
    let root = checkout();
    cmd()
        .arg("--json")
        .args(["setup", "--type", "bestiary", "--source"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("\"ok\": true"))
        .stdout(contains("\"name\": \"Owlbear\""));
}

#[test]
fn setup_with_missing_source_fails() {
    cmd()
        .args(["setup", "--source", "/definitely/not/a/checkout"])
        .assert()
        .failure()
        .stderr(contains("does not exist"));
}

#[test]
fn setup_without_source_fails() {
    cmd()
        .arg("setup")
        .assert()
        .failure()
        .stderr(contains("FIVETOOLS_DATA_PATH"));
}

#[test]
fn source_falls_back_to_environment() {
    let root = checkout();
    cmd()
        .env("FIVETOOLS_DATA_PATH", root.path())
        .arg("setup")
        .assert()
        .success()
        .stdout(contains("imported 3 monsters"));
}

#[test]
fn encounter_filters_and_sorts() {
    let root = checkout();
    cmd()
        .args(["encounter", "--challenge-rating", "3", "--environment", "forest", "--source"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("3\tOwlbear\tMM\n1/4\tGoblin\tMM"));
}

#[test]
fn short_flags_match_long_ones() {
    let root = checkout();
    cmd()
        .args(["encounter", "--challenge-rating", "3", "-e", "forest", "-s"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("3\tOwlbear\tMM\n1/4\tGoblin\tMM"));
    cmd()
        .args(["setup", "-t", "bestiary", "-s"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("imported 3 monsters"));
}

#[test]
fn encounter_accepts_fractional_rating() {
    let root = checkout();
    cmd()
        .args(["encounter", "--challenge-rating", "1/2", "--source"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("Goblin"))
        .stdout(contains("Owlbear").not());
}

#[test]
fn strip_tags_flag_cleans_actions() {
    let root = checkout();
    cmd()
        .args(["--json", "--strip-tags", "encounter", "--challenge-rating", "1/4", "--source"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("Melee Weapon Attack: +3 to hit."));
}

#[test]
fn log_file_is_written() {
    let root = checkout();
    let log = root.path().join("ingest.log");
    cmd()
        .args(["--log-level", "info", "--log-file"])
        .arg(&log)
        .args(["setup", "--source"])
        .arg(root.path())
        .assert()
        .success();
    let text = fs::read_to_string(&log).expect("log file");
    assert!(text.contains("Bestiary import complete"));
}
