use assert_cmd::Command;
use predicates::prelude::*;

fn datespan() -> Command {
    let mut cmd = Command::cargo_bin("datespan").unwrap();
    cmd.env_remove("TZ").env_remove("RUST_LOG");
    cmd
}

// ── parse ───────────────────────────────────────────────────────────────

#[test]
fn test_parse_month_text() {
    datespan()
        .args(["--timezone", "Europe/Berlin", "parse", "2008-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("span:  2008-02 (month)"))
        .stdout(predicate::str::contains("start: 2008-02-01 00:00:00+0100"))
        .stdout(predicate::str::contains("end:   2008-02-29 23:59:59+0100"))
        .stdout(predicate::str::contains("days:  29"));
}

#[test]
fn test_parse_json_with_days() {
    let output = datespan()
        .args(["parse", "2007-W14", "--days", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["span"], "2007-W14");
    assert_eq!(doc["kind"], "week");
    assert_eq!(doc["start"], "2007-04-02 00:00:00+0000");
    assert_eq!(doc["amount_of_days"], 7);
    let days = doc["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[6], "2007-04-08");
}

#[test]
fn test_parse_empty_prints_nothing() {
    datespan()
        .args(["parse", ""])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_parse_relative_day_uses_fixed_now() {
    datespan()
        .args(["--now", "2015-06-10T12:00:00Z", "parse", "tomorrow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("span:  2015-06-11 (day)"));
}

#[test]
fn test_parse_garbage_fails() {
    datespan()
        .args(["parse", "next blue moon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be parsed as a datespan"));
}

// ── offset ──────────────────────────────────────────────────────────────

#[test]
fn test_offset_follows_dst() {
    datespan()
        .args(["offset", "Europe/Berlin", "2007-08-21"])
        .assert()
        .success()
        .stdout("+0200 DST\n");
    datespan()
        .args(["offset", "Europe/Berlin", "2007-01-21"])
        .assert()
        .success()
        .stdout("+0100 standard\n");
}

#[test]
fn test_offset_unknown_zone() {
    datespan()
        .args(["offset", "Mars/Olympus_Mons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mars/Olympus_Mons"));
}

// ── format ──────────────────────────────────────────────────────────────

#[test]
fn test_format_timestamp_in_utc() {
    datespan()
        .args(["format", "@1187872547", "--pattern", "%Y-%m-%dT%H:%M:%S%:z"])
        .assert()
        .success()
        .stdout("2007-08-23T12:35:47+00:00\n");
}

#[test]
fn test_format_translates_zone() {
    datespan()
        .args(["format", "2007-08-23T12:35:47Z", "--zone", "Europe/Berlin"])
        .assert()
        .success()
        .stdout("2007-08-23 14:35:47+0200\n");
}

#[test]
fn test_bad_now_is_rejected() {
    datespan()
        .args(["--now", "yesterday-ish", "parse", "2015"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yesterday-ish"));
}
