//! Migration executor behavior against real database files: legacy
//! upgrades, idempotency, and the backup-before-migrate ordering.

use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;

use timekeep::db::Db;
use timekeep::db::schema::{column_exists, table_exists};
use timekeep::db::version::{LATEST_VERSION, current_version};
use timekeep::errors::AppError;

fn scratch_dir(name: &str) -> PathBuf {
    let mut dir = env::temp_dir();
    dir.push(format!("timekeep_migration_{}", name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A database file as the original legacy app would have left it: v1
/// tables, no version marker, free-text descriptions only.
fn write_legacy_db(path: &PathBuf) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            color TEXT DEFAULT '#0000FF',
            hourly_rate REAL DEFAULT 0,
            company_id INTEGER,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
         );
         CREATE TABLE companies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
         );
         CREATE TABLE work_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT DEFAULT ''
         );
         CREATE TABLE time_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER,
            description TEXT,
            work_type_id INTEGER,
            start_time TIMESTAMP NOT NULL,
            end_time TIMESTAMP,
            duration INTEGER DEFAULT 0,
            paid INTEGER DEFAULT 0
         );
         INSERT INTO projects (id, name) VALUES (1, 'Legacy');
         INSERT INTO time_sessions (project_id, description, start_time, end_time, duration) VALUES
            (1, 'Refactoring', '2024-11-01T09:00:00', '2024-11-01T10:00:00', 3600),
            (1, 'Refactoring', '2024-11-02T09:00:00', '2024-11-02T11:00:00', 7200),
            (1, 'Support',     '2024-11-03T09:00:00', '2024-11-03T09:30:00', 1800),
            (1, '',            '2024-11-04T09:00:00', '2024-11-04T09:30:00', 1800);",
    )
    .unwrap();
}

#[test]
fn legacy_file_migrates_to_latest_with_backup() {
    let dir = scratch_dir("legacy_upgrade");
    let db_path = dir.join("tracker.sqlite");
    write_legacy_db(&db_path);

    let db = Db::open(Some(&db_path)).unwrap();
    assert_eq!(current_version(&db.conn).unwrap(), LATEST_VERSION);
    assert!(table_exists(&db.conn, "task_names").unwrap());
    assert!(table_exists(&db.conn, "window_positions").unwrap());
    assert!(column_exists(&db.conn, "time_sessions", "task_name_id").unwrap());

    // Backfill: two distinct non-empty descriptions, three linked rows.
    let names: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM task_names", [], |r| r.get(0))
        .unwrap();
    assert_eq!(names, 2);
    let linked: i64 = db
        .conn
        .query_row(
            "SELECT COUNT(*) FROM time_sessions WHERE task_name_id IS NOT NULL",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(linked, 3);

    // A pre-migration backup landed in the backups directory.
    let backups: Vec<_> = fs::read_dir(dir.join("backups"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("pre_migration"))
        .collect();
    assert_eq!(backups.len(), 1);

    // The backup preserves the pre-migration shape.
    let backup_conn = Connection::open(backups[0].path()).unwrap();
    assert!(!table_exists(&backup_conn, "task_names").unwrap());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reopening_migrated_file_makes_no_second_backup() {
    let dir = scratch_dir("reopen");
    let db_path = dir.join("tracker.sqlite");
    write_legacy_db(&db_path);

    drop(Db::open(Some(&db_path)).unwrap());
    drop(Db::open(Some(&db_path)).unwrap());

    let backups = fs::read_dir(dir.join("backups")).unwrap().count();
    assert_eq!(backups, 1);

    // Running the v2 backfill twice produced the same dictionary.
    let db = Db::open(Some(&db_path)).unwrap();
    let names: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM task_names", [], |r| r.get(0))
        .unwrap();
    assert_eq!(names, 2);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_backup_aborts_migration_entirely() {
    let dir = scratch_dir("backup_failure");
    let db_path = dir.join("tracker.sqlite");
    write_legacy_db(&db_path);

    // A plain file squatting on the backups path makes the backup copy
    // impossible.
    fs::write(dir.join("backups"), b"not a directory").unwrap();

    let err = Db::open(Some(&db_path));
    assert!(matches!(err, Err(AppError::MigrationBackupFailed(_))));

    // Never migrate without a verified backup: the schema must be exactly
    // as old as before.
    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(current_version(&conn).unwrap(), 1);
    assert!(!table_exists(&conn, "task_names").unwrap());
    assert!(!table_exists(&conn, "window_positions").unwrap());
    assert!(!column_exists(&conn, "time_sessions", "task_name_id").unwrap());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn fresh_database_lands_at_latest_version_without_backup() {
    let dir = scratch_dir("fresh");
    let db_path = dir.join("tracker.sqlite");

    let db = Db::open(Some(&db_path)).unwrap();
    assert_eq!(current_version(&db.conn).unwrap(), LATEST_VERSION);
    assert!(table_exists(&db.conn, "task_names").unwrap());

    // A file created by this open carries no data yet, so no
    // pre-migration backup is taken for it.
    assert!(!dir.join("backups").exists());

    let _ = fs::remove_dir_all(&dir);
}
