//! Integration tests for the attic binary.
//!
//! These exercise the full command-line surface: argument validation, exit
//! codes, and the `--json` and `--dry-run` flags.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Build a minimal valid store with one section and one blob.
fn valid_store() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("metadata"),
        "[v001]\n\
         author = Ada\n\
         timestamp = 1441065600\n\
         directory = docs\n\
         title = first\n\
         added = a.txt\n",
    )
    .unwrap();
    let docs = dir.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("index"), "idx").unwrap();
    std::fs::write(docs.join("a.txt"), "content").unwrap();
    dir
}

/// Initialize a destination repository with identity configured.
fn dest_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init", "-b", "main"]);
    run_git(dir.path(), &["config", "user.email", "migrator@example.com"]);
    run_git(dir.path(), &["config", "user.name", "Migrator"]);
    dir
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn attic() -> Command {
    Command::cargo_bin("attic").unwrap()
}

#[test]
fn successful_migration_exits_zero() {
    let store = valid_store();
    let repo = dest_repo();

    attic()
        .args([store.path(), repo.path(), Path::new("imports")])
        .assert()
        .success()
        .stdout(predicate::str::contains("migrated 1 change-set(s)"));
}

#[test]
fn quiet_suppresses_progress_output() {
    let store = valid_store();
    let repo = dest_repo();

    attic()
        .arg("--quiet")
        .args([store.path(), repo.path(), Path::new("imports")])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_arguments_exit_two() {
    attic().assert().failure().code(2);
}

#[test]
fn missing_store_exits_two() {
    let repo = dest_repo();

    attic()
        .args([Path::new("/nonexistent/store"), repo.path(), Path::new("imports")])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("versions store not found"));
}

#[test]
fn existing_branch_exits_two() {
    let store = valid_store();
    let repo = dest_repo();
    std::fs::write(repo.path().join("seed.txt"), "x").unwrap();
    run_git(repo.path(), &["add", "seed.txt"]);
    run_git(repo.path(), &["commit", "-m", "seed"]);
    run_git(repo.path(), &["branch", "imports"]);

    attic()
        .args([store.path(), repo.path(), Path::new("imports")])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("branch already exists"));
}

#[test]
fn invalid_branch_name_exits_two() {
    let store = valid_store();
    let repo = dest_repo();

    attic()
        .args([store.path(), repo.path(), Path::new("bad..name")])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid destination branch name"));
}

#[test]
fn missing_author_exits_two() {
    let store = TempDir::new().unwrap();
    std::fs::write(store.path().join("metadata"), "[v001]\ntimestamp = 1\n").unwrap();
    let repo = dest_repo();

    attic()
        .args([store.path(), repo.path(), Path::new("imports")])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("author missing"));
}

#[test]
fn replay_failure_exits_one() {
    let store = TempDir::new().unwrap();
    std::fs::write(
        store.path().join("metadata"),
        "[v001]\n\
         author = Ada\n\
         timestamp = 1\n\
         directory = docs\n\
         deleted = ghost.txt\n",
    )
    .unwrap();
    let docs = store.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("index"), "idx").unwrap();
    let repo = dest_repo();

    attic()
        .args([store.path(), repo.path(), Path::new("imports")])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ghost.txt"));
}

#[test]
fn json_summary_is_parseable() {
    let store = valid_store();
    let repo = dest_repo();

    let output = attic()
        .arg("--quiet")
        .arg("--json")
        .args([store.path(), repo.path(), Path::new("imports")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["branch"], "imports");
    assert_eq!(report["dry_run"], false);
    assert_eq!(report["commits"][0]["section"], "v001");
    assert_eq!(report["commits"][0]["author"], "Ada");
    assert!(report["commits"][0]["commit"].is_string());
}

#[test]
fn dry_run_creates_nothing() {
    let store = valid_store();
    let repo = dest_repo();

    attic()
        .arg("--dry-run")
        .args([store.path(), repo.path(), Path::new("imports")])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run: 1 change-set(s) validated"));

    let branches = Command::new("git")
        .args(["branch", "--list", "imports"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&branches.stdout).trim().is_empty());
}
