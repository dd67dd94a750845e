#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn tk() -> Command {
    cargo_bin_cmd!("timekeep")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// existing file (plus its backups directory).
pub fn setup_test_db(name: &str) -> String {
    let mut dir: PathBuf = env::temp_dir();
    dir.push(format!("timekeep_test_{}", name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir.push("timekeep.sqlite");
    dir.to_string_lossy().to_string()
}

/// Initialize the database schema via the CLI.
pub fn init_db(db_path: &str) {
    tk().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}
