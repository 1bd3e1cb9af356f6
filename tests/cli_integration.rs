//! Integration tests for the `zt` CLI.
//!
//! Each test creates a temp board directory, runs `zt` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the built `zt` binary.
fn zt_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("zt");
    path
}

fn zt(root: &Path, args: &[&str]) -> Output {
    Command::new(zt_bin())
        .args(["-C", root.to_str().unwrap()])
        .args(args)
        .output()
        .expect("failed to run zt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// `zt init` + return the board root
fn init_board(tmp: &TempDir) -> PathBuf {
    let root = tmp.path().to_path_buf();
    let output = zt(&root, &["init", "--name", "test board"]);
    assert!(output.status.success(), "init failed: {}", stderr(&output));
    root
}

/// Add an item and return the id printed by `zt add`
fn add_item(root: &Path, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    let output = zt(root, &full);
    assert!(output.status.success(), "add failed: {}", stderr(&output));
    stdout(&output)
        .trim()
        .strip_prefix("added ")
        .expect("add output")
        .to_string()
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_the_board_files() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);

    assert!(root.join("z10/board.json").exists());
    assert!(root.join("z10/config.toml").exists());

    // Second init without --force refuses
    let again = zt(&root, &["init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already initialized"));
}

#[test]
fn commands_outside_a_board_fail_with_a_hint() {
    let tmp = TempDir::new().unwrap();
    let output = zt(tmp.path(), &["list"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not a triage board"));
}

// ---------------------------------------------------------------------------
// add / list / show
// ---------------------------------------------------------------------------

#[test]
fn added_items_appear_in_their_column() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);

    add_item(
        &root,
        &[
            "Fix login",
            "--priority",
            "critical",
            "--assignee",
            "sam",
            "--tag",
            "auth",
        ],
    );
    add_item(&root, &["Update docs", "--priority", "low"]);

    let output = zt(&root, &["list"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("New (2)"));
    // Critical sorts before low within the column
    let login_at = text.find("Fix login").unwrap();
    let docs_at = text.find("Update docs").unwrap();
    assert!(login_at < docs_at);
    assert!(text.contains("@sam"));
    assert!(text.contains("#auth"));
}

#[test]
fn list_json_groups_by_status_and_honors_filters() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);
    add_item(&root, &["Fix login"]);
    add_item(&root, &["Update docs"]);

    let output = zt(&root, &["list", "--json", "-q", "login"]);
    assert!(output.status.success());
    let board: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[0]["status"], "new");
    assert_eq!(columns[0]["count"], 1);
    assert_eq!(columns[0]["items"][0]["title"], "Fix login");
    // The other item matched nothing, nowhere
    let total: u64 = columns.iter().map(|c| c["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 1);
}

#[test]
fn show_prints_the_item_and_errors_on_unknown_ids() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);
    let id = add_item(&root, &["Fix login", "--due", "2025-03-01"]);

    let output = zt(&root, &["show", &id]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Fix login"));
    assert!(text.contains("priority: High"));
    assert!(text.contains("due:      2025-03-01"));

    let missing = zt(&root, &["show", "nope"]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("item not found"));
}

// ---------------------------------------------------------------------------
// state / rm
// ---------------------------------------------------------------------------

#[test]
fn state_moves_an_item_between_columns() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);
    let id = add_item(&root, &["Fix login"]);

    let output = zt(&root, &["state", &id, "blocked"]);
    assert!(output.status.success());

    let listed = zt(&root, &["list", "--json"]);
    let board: serde_json::Value = serde_json::from_str(&stdout(&listed)).unwrap();
    assert_eq!(board["columns"][2]["status"], "blocked");
    assert_eq!(board["columns"][2]["count"], 1);

    let bad = zt(&root, &["state", &id, "archived"]);
    assert!(!bad.status.success());
    assert!(stderr(&bad).contains("unknown status"));
}

#[test]
fn rm_deletes_and_reports_unknown_ids() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);
    let id = add_item(&root, &["Fix login"]);

    let output = zt(&root, &["rm", &id]);
    assert!(output.status.success());

    let listed = zt(&root, &["list", "--json"]);
    let board: serde_json::Value = serde_json::from_str(&stdout(&listed)).unwrap();
    let total: u64 = board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["count"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 0);

    let again = zt(&root, &["rm", &id]);
    assert!(!again.status.success());
}

// ---------------------------------------------------------------------------
// export / import
// ---------------------------------------------------------------------------

#[test]
fn export_import_round_trips_between_boards() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);
    add_item(&root, &["Fix login", "--tag", "auth"]);
    add_item(&root, &["Update docs"]);

    let export_path = tmp.path().join("dump.json");
    let output = zt(&root, &["export", "-o", export_path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("exported 2 items"));

    // Import into a second, fresh board
    let other = TempDir::new().unwrap();
    let other_root = init_board(&other);
    let output = zt(
        &other_root,
        &["import", export_path.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("imported 2 items"));

    let listed = zt(&other_root, &["list", "--json"]);
    let board: serde_json::Value = serde_json::from_str(&stdout(&listed)).unwrap();
    assert_eq!(board["columns"][0]["count"], 2);
}

#[test]
fn import_rejects_a_non_array_file() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);

    let payload = tmp.path().join("bad.json");
    fs::write(&payload, r#"{"title":"not a list"}"#).unwrap();

    let before = fs::read(root.join("z10/board.json")).unwrap();
    let output = zt(&root, &["import", payload.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not a JSON array"));
    // No persistence side effects
    assert_eq!(before, fs::read(root.join("z10/board.json")).unwrap());
}

#[test]
fn import_synthesizes_missing_ids() {
    let tmp = TempDir::new().unwrap();
    let root = init_board(&tmp);

    let payload = tmp.path().join("in.json");
    fs::write(&payload, r#"[{"title":"A"}]"#).unwrap();
    let output = zt(&root, &["import", payload.to_str().unwrap()]);
    assert!(output.status.success());

    let listed = zt(&root, &["list", "--json"]);
    let board: serde_json::Value = serde_json::from_str(&stdout(&listed)).unwrap();
    let item = &board["columns"][0]["items"][0];
    assert_eq!(item["title"], "A");
    assert!(!item["id"].as_str().unwrap().is_empty());
}
