//! CLI end-to-end tests that invoke the compiled `mirror` binary.

use assert_cmd::Command;
use mirror_test_utils::TestTree;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn mirror() -> Command {
    Command::cargo_bin("mirror").unwrap()
}

fn args(tree: &TestTree, interval: &str, log: &Path) -> Vec<std::ffi::OsString> {
    vec![
        tree.source().into_os_string(),
        tree.replica().into_os_string(),
        interval.into(),
        log.as_os_str().to_os_string(),
    ]
}

#[test]
fn help_lists_positional_arguments() {
    mirror()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<SOURCE>"))
        .stdout(predicate::str::contains("<LOG_FILE>"));
}

#[test]
fn non_integer_interval_is_a_usage_error() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "a");
    let log = tree.root().join("sync.log");

    mirror()
        .args(args(&tree, "ten", &log))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interval").or(predicate::str::contains("INTERVAL")));

    tree.assert_replica_missing("");
    assert!(!log.exists(), "no logging before arguments are valid");
}

#[test]
fn once_mirrors_tree_and_logs_to_file() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "alpha");
    tree.write_source("nested/b.txt", "beta");
    let log = tree.root().join("logs").join("sync.log");

    mirror()
        .args(args(&tree, "0", &log))
        .arg("--once")
        .assert()
        .success()
        .stderr(predicate::str::contains("Copied file"));

    tree.assert_replica_matches_source();

    let log_text = fs::read_to_string(&log).unwrap();
    assert!(log_text.contains("INFO"), "log:\n{}", log_text);
    assert!(log_text.contains("Created directory"), "log:\n{}", log_text);
    assert!(
        log_text.contains(&format!("{}", tree.replica().join("nested").join("b.txt").display())),
        "log should name the copied path:\n{}",
        log_text
    );
    assert!(log_text.contains("Synchronization pass 1 completed"), "log:\n{}", log_text);
}

#[test]
fn log_file_is_appended_across_runs() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "alpha");
    let log = tree.root().join("sync.log");

    for _ in 0..2 {
        mirror().args(args(&tree, "0", &log)).arg("--once").assert().success();
    }

    let log_text = fs::read_to_string(&log).unwrap();
    assert_eq!(log_text.matches("Starting folder synchronization").count(), 2);
    assert_eq!(log_text.matches("Copied file").count(), 1, "second run copies nothing");
}

#[test]
fn missing_source_stops_the_loop_with_failure() {
    let tree = TestTree::new();
    tree.remove_source("");
    let log = tree.root().join("sync.log");

    // No --once: the loop itself must stop on the first failed pass
    mirror()
        .args(args(&tree, "0", &log))
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Source folder not found"));

    let log_text = fs::read_to_string(&log).unwrap();
    assert!(log_text.contains("ERROR"), "log:\n{}", log_text);
    assert!(log_text.contains("An error occurred"), "log:\n{}", log_text);
}

#[test]
fn dry_run_leaves_replica_untouched() {
    let tree = TestTree::with_replica();
    tree.write_source("new.txt", "new");
    tree.write_replica("orphan.txt", "orphan");
    let log = tree.root().join("sync.log");

    mirror()
        .args(args(&tree, "0", &log))
        .args(["--once", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[dry-run] Would copy file"))
        .stderr(predicate::str::contains("[dry-run] Would remove file"));

    tree.assert_replica_missing("new.txt");
    assert_eq!(tree.read_replica("orphan.txt"), "orphan");
}

#[test]
fn json_flag_prints_pass_report() {
    let tree = TestTree::new();
    tree.write_source("a.txt", "alpha");
    let log = tree.root().join("sync.log");

    let output = mirror()
        .args(args(&tree, "0", &log))
        .args(["--once", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["pass"], 1);
    assert_eq!(report["dry_run"], false);
    let actions = report["actions"].as_array().unwrap();
    assert!(actions.iter().any(|a| a["action"] == "copy_file"));
}

#[test]
fn replica_inside_source_is_rejected() {
    let tree = TestTree::new();
    let log = tree.root().join("sync.log");

    mirror()
        .arg(tree.source())
        .arg(tree.source().join("replica"))
        .arg("0")
        .arg(&log)
        .arg("--once")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("inside source"));

    assert!(!tree.source().join("replica").exists());
}
