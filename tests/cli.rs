//! End-to-end tests for the `tdf` binary.
//!
//! Every test points `--db` at a fresh temp directory and drives the CLI as a
//! subprocess.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

struct TestDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDb {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data").join("todoforme-data.json");
        Ok(Self { _dir: dir, path })
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tdf").unwrap();
        cmd.arg("--db").arg(&self.path).env_remove("RUST_LOG");
        cmd
    }

    fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.cmd().arg("--json").args(args).output()?;
        assert!(output.status.success(), "{args:?} failed: {output:?}");
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn add(&self, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let out = self.json(&full)?;
        Ok(out["id"].as_str().unwrap_or_default().to_string())
    }

    fn document(&self) -> Result<Value, Box<dyn std::error::Error>> {
        Ok(serde_json::from_str(&fs::read_to_string(&self.path)?)?)
    }
}

fn titles(list: &Value) -> Vec<String> {
    list.as_array()
        .into_iter()
        .flatten()
        .filter_map(|t| t["title"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn add_list_and_show() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    let first = db.add(&["Write report", "--category", "work", "--date", "2024-05-02"])?;
    let second = db.add(&["Stretch", "--date", "2024-05-02", "--order", "-1"])?;
    assert!(first.starts_with("todo_"));
    assert_ne!(first, second);

    let list = db.json(&["list", "--date", "2024-05-02"])?;
    assert_eq!(titles(&list), vec!["Stretch", "Write report"]);
    assert_eq!(list[1]["category"], "default_1");
    assert_eq!(list[1]["status"], "waiting");

    db.cmd()
        .args(["list", "--date", "2024-05-02"])
        .assert()
        .success()
        .stdout(contains("Write report"))
        .stdout(contains("Work"));

    db.cmd()
        .args(["show", &first])
        .assert()
        .success()
        .stdout(contains("Date:         2024-05-02"));

    let stored = db.document()?;
    assert_eq!(stored["todos"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn status_changes_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    let id = db.add(&["Focus block"])?;

    let started = db.json(&["start", &id])?;
    assert_eq!(started["from"], "waiting");
    assert_eq!(started["to"], "in_progress");

    let paused = db.json(&["status", &id, "paused"])?;
    assert_eq!(paused["from"], "in_progress");
    assert_eq!(paused["minutesAdded"], 0);

    db.json(&["complete", &id])?;
    let stored = db.document()?;
    let task = &stored["todos"][0];
    assert_eq!(task["status"], "completed");
    assert!(task["startTime"].is_null());
    Ok(())
}

#[test]
fn child_and_cascading_delete() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    let parent = db.add(&["Plan trip", "--date", "2024-06-01"])?;
    let child = db.json(&["child", &parent])?;
    let child_id = child["id"].as_str().unwrap_or_default().to_string();
    db.add(&["Book hotel", "--parent", &child_id])?;

    let list = db.json(&["list", "--date", "2024-06-01", "--tree"])?;
    assert_eq!(titles(&list), vec!["Plan trip", "New sub-task", "Book hotel"]);
    assert_eq!(list[2]["depth"], 2);

    let deleted = db.json(&["delete", &parent])?;
    assert_eq!(deleted["removed"], 3);
    assert_eq!(db.json(&["list", "--date", "2024-06-01"])?, Value::Array(Vec::new()));
    Ok(())
}

#[test]
fn carry_over_copies_unfinished_top_level_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    db.cmd()
        .args(["settings", "set", "carryOverUtcOffsetHours", "0"])
        .assert()
        .success();

    let today = Utc::now().date_naive();
    let yesterday = (today - Duration::days(1)).to_string();
    let open = db.add(&["Unfinished", "--date", &yesterday])?;
    db.add(&["Nested", "--parent", &open])?;
    let done = db.add(&["Finished", "--date", &yesterday])?;
    db.json(&["complete", &done])?;

    let result = db.json(&["carry-over"])?;
    assert_eq!(result["copied"], 1);

    let list = db.json(&["list", "--date", &today.to_string()])?;
    assert_eq!(titles(&list), vec!["Unfinished"]);
    assert_eq!(list[0]["status"], "waiting");
    assert_eq!(list[0]["totalTime"], 0);
    Ok(())
}

#[test]
fn missing_ids_exit_with_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    db.cmd()
        .args(["start", "todo_0_0"])
        .assert()
        .code(2)
        .stderr(contains("todo_0_0"));
    db.cmd()
        .args(["category", "delete", "nope"])
        .assert()
        .code(2);
    db.cmd()
        .args(["add", "x", "--date", "someday"])
        .assert()
        .code(2)
        .stderr(contains("someday"));
    Ok(())
}

#[test]
fn out_of_range_carry_over_offset_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    db.cmd()
        .args(["settings", "set", "carryOverUtcOffsetHours", "1000000"])
        .assert()
        .code(2)
        .stderr(contains("between -23 and 23"));

    let settings = db.json(&["settings", "show"])?;
    assert_eq!(settings["carryOverUtcOffsetHours"], 9);
    db.cmd().arg("carry-over").assert().success();
    Ok(())
}

#[test]
fn clear_requires_confirmation() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    db.add(&["Keep"])?;

    db.cmd().arg("clear").assert().code(2);
    assert_eq!(db.document()?["todos"].as_array().map(Vec::len), Some(1));

    db.cmd()
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(contains("cleared"));
    assert_eq!(db.document()?["todos"], Value::Array(Vec::new()));
    Ok(())
}

#[test]
fn export_then_import_with_backup() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    db.add(&["Exported", "--date", "2024-05-02"])?;
    let exported: Value = db.json(&["export"])?;
    assert!(exported["exportDate"].is_string());
    assert_eq!(exported["settings"]["carryOverUtcOffsetHours"], 9);

    let bundle_path = db.path.with_file_name("bundle.json");
    fs::write(&bundle_path, serde_json::to_string(&exported)?)?;

    db.add(&["Added after export", "--date", "2024-05-02"])?;
    db.cmd()
        .arg("import")
        .arg(&bundle_path)
        .assert()
        .success()
        .stdout(contains("Created backup"));

    let list = db.json(&["list", "--date", "2024-05-02"])?;
    assert_eq!(titles(&list), vec!["Exported"]);
    assert!(backup_dir(&db.path).read_dir()?.next().is_some());
    Ok(())
}

#[test]
fn import_rejects_empty_bundle() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    let bundle_path = db.path.with_file_name("empty.json");
    fs::create_dir_all(bundle_path.parent().unwrap_or(Path::new(".")))?;
    fs::write(&bundle_path, "{}")?;
    db.cmd().arg("import").arg(&bundle_path).assert().code(2);
    Ok(())
}

#[test]
fn stats_and_total() -> Result<(), Box<dyn std::error::Error>> {
    let db = TestDb::new()?;
    let id = db.add(&["Done", "--date", "2024-05-01", "--category", "Study"])?;
    db.add(&["Open", "--date", "2024-05-01"])?;
    db.json(&["complete", &id])?;

    let daily = db.json(&["stats", "daily", "--date", "2024-05-01"])?;
    assert_eq!(daily["totalTodos"], 2);
    assert_eq!(daily["completedTodos"], 1);
    assert_eq!(daily["categories"]["default_3"], 1);

    let weekly = db.json(&["stats", "weekly", "--date", "2024-05-01"])?;
    assert_eq!(weekly["weekStart"], "2024-04-28");

    let total = db.json(&["total", "--date", "2024-05-01"])?;
    assert_eq!(total["totalMinutes"], 0);
    Ok(())
}

fn backup_dir(data: &Path) -> PathBuf {
    data.parent().unwrap_or(Path::new(".")).join("backup")
}
