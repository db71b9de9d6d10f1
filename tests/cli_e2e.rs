use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn shelf(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.current_dir(dir)
        .env("SHELF_GLOBAL_DATA", dir.join("global"))
        .env("NO_COLOR", "1")
        .env_remove("SHELF_LOG");
    cmd
}

#[test]
fn test_event_add_show_delete() {
    let temp = tempfile::tempdir().unwrap();

    shelf(temp.path())
        .args(["event", "add", "2024-01-01", "New", "Year", "-r", "1w"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Event 'New Year' added on 2024-01-01.",
        ));

    shelf(temp.path())
        .args(["event", "on", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New Year"));

    shelf(temp.path())
        .args(["event", "reminders", "--on", "2023-12-26"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New Year"));

    shelf(temp.path())
        .args(["event", "delete", "2024-01-01", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    shelf(temp.path())
        .args(["event", "on", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No events on 2024-01-01."));
}

#[test]
fn test_global_scope_is_separate() {
    let temp = tempfile::tempdir().unwrap();

    shelf(temp.path())
        .args(["-g", "shortcut", "add", "docs", "https://docs.rs"])
        .assert()
        .success();

    shelf(temp.path())
        .args(["shortcut", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No shortcuts added yet."));

    shelf(temp.path())
        .args(["shortcut", "list", "-g"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://docs.rs"));
}

#[test]
fn test_student_results() {
    let temp = tempfile::tempdir().unwrap();

    shelf(temp.path())
        .args(["student", "add", "R1", "Alice", "CSE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Student Alice added successfully!"));

    shelf(temp.path())
        .args(["student", "marks", "R1", "1", "Math", "80"])
        .assert()
        .success();
    shelf(temp.path())
        .args(["student", "marks", "R1", "1", "Physics", "90"])
        .assert()
        .success();

    shelf(temp.path())
        .args(["student", "results", "CSE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("170").and(predicate::str::contains("85.00")));

    shelf(temp.path())
        .args(["student", "add", "R1", "Bob", "CSE"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Student with roll number R1 already exists.",
        ));
}

#[test]
fn test_rejects_bad_link() {
    let temp = tempfile::tempdir().unwrap();

    shelf(temp.path())
        .args(["shortcut", "add", "bad", "not a url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid URL"));

    shelf(temp.path())
        .args(["shortcut", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No shortcuts added yet."));
}

#[test]
fn test_corrupt_store_then_doctor_repair() {
    let temp = tempfile::tempdir().unwrap();
    let store_dir = temp.path().join(".shelf");
    fs::create_dir_all(&store_dir).unwrap();
    fs::write(store_dir.join("events.json"), b"{ definitely not").unwrap();

    shelf(temp.path())
        .args(["event", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Corrupt store file"));

    shelf(temp.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("corrupt").and(predicate::str::contains("--repair")));

    shelf(temp.path())
        .args(["doctor", "--repair"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved corrupt events store"));

    shelf(temp.path())
        .args(["event", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No events available."));
}

#[test]
fn test_export_writes_archive() {
    let temp = tempfile::tempdir().unwrap();
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();

    shelf(temp.path())
        .args(["export", "--dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("No stores to export."));

    shelf(temp.path())
        .args(["shortcut", "add", "docs", "https://docs.rs"])
        .assert()
        .success();

    shelf(temp.path())
        .args(["export", "--dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 store(s)"));

    let archives: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(".tar.gz"))
        .collect();
    assert_eq!(archives.len(), 1);
}

#[test]
fn test_age_and_zodiac() {
    let temp = tempfile::tempdir().unwrap();

    shelf(temp.path())
        .args(["age", "2000-01-15", "--on", "2024-03-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("24 years, 2 months, 5 days"));

    shelf(temp.path())
        .args(["zodiac", "2000-12-25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Capricorn"));
}

#[test]
fn test_event_with_numeric_name_deletes_by_name() {
    let temp = tempfile::tempdir().unwrap();

    shelf(temp.path())
        .args(["event", "add", "2024-05-01", "2024"])
        .assert()
        .success();

    shelf(temp.path())
        .args(["event", "delete", "2024-05-01", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    shelf(temp.path())
        .args(["event", "on", "2024-05-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No events on 2024-05-01."));
}

#[test]
fn test_student_top_zero_is_rejected() {
    let temp = tempfile::tempdir().unwrap();

    shelf(temp.path())
        .args(["student", "top", "0"])
        .assert()
        .failure();
}
