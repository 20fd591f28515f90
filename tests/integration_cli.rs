// Drives the compiled binary end to end. HOME is pointed at a tempdir so
// each test gets its own database under $HOME/.local/state/liftlog.

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

fn liftlog(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("liftlog").unwrap();
    cmd.env("HOME", home.path());
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_the_subcommands() {
    let home = tempdir().unwrap();
    let out = stdout_of(liftlog(&home).arg("--help"));

    for sub in ["templates", "exercises", "start", "history", "export", "next"] {
        assert!(out.contains(sub), "--help should mention '{sub}'");
    }
}

#[test]
fn templates_lists_the_builtins() {
    let home = tempdir().unwrap();
    let out = stdout_of(liftlog(&home).arg("templates"));

    assert!(out.contains("stronglifts-a"));
    assert!(out.contains("stronglifts-b"));
    assert!(out.contains("full-body"));
}

#[test]
fn exercises_filters_by_equipment() {
    let home = tempdir().unwrap();
    let out = stdout_of(liftlog(&home).args(["exercises", "--equipment", "barbell"]));

    assert!(out.contains("squat"));
    assert!(out.contains("deadlift"));
    assert!(!out.contains("plank"));
}

#[test]
fn favorite_round_trips_through_the_cli() {
    let home = tempdir().unwrap();

    liftlog(&home).args(["favorite", "squat"]).assert().success();
    let out = stdout_of(liftlog(&home).args(["exercises", "--favorites"]));
    assert!(out.contains("squat"));
    assert!(!out.contains("bench-press"));

    liftlog(&home).args(["favorite", "squat", "--unset"]).assert().success();
    let out = stdout_of(liftlog(&home).args(["exercises", "--favorites"]));
    assert!(out.contains("no exercises match"));
}

#[test]
fn next_shows_empty_bar_starting_targets() {
    let home = tempdir().unwrap();
    let out = stdout_of(liftlog(&home).arg("next"));

    assert!(out.contains("week 1"));
    assert!(out.contains("StrongLifts A"));
    assert!(out.contains("squat"));
    assert!(out.contains("45 lb"));
}

#[test]
fn history_on_a_fresh_database_is_empty() {
    let home = tempdir().unwrap();
    let out = stdout_of(liftlog(&home).arg("history"));

    assert!(out.contains("0 workouts"));
}

#[test]
fn export_writes_a_csv_header_even_when_empty() {
    let home = tempdir().unwrap();
    let csv_path = home.path().join("out.csv");

    let out = stdout_of(liftlog(&home).arg("export").arg(&csv_path));
    assert!(out.contains("exported 0 sessions"));

    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("date,template,duration_secs"));
}

#[test]
fn start_with_unknown_template_fails() {
    let home = tempdir().unwrap();
    liftlog(&home).args(["start", "leg-day"]).assert().failure();
}
