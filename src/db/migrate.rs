//! Migration Executor: a strictly ordered chain of versioned, idempotent
//! steps, guarded by a mandatory pre-migration file backup.
//!
//! Ordering is the whole point: backup, then migrate, then record the new
//! version. The version bump commits in the same transaction as the
//! step's data changes, so a crash can never leave data migrated but
//! unversioned (or the reverse). A step that fails rolls back alone and
//! stops the chain; the database stays at the last good version and the
//! error names the backup file that restores the pre-migration state.

use crate::db::schema::column_exists;
use crate::db::version::{LATEST_VERSION, current_version, set_version};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use chrono::Local;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

struct Migration {
    version: u32,
    name: &'static str,
    apply: fn(&Connection) -> rusqlite::Result<()>,
}

/// Every step must be safe to re-run: a prior partial run may have left
/// some substeps committed (hence the IF NOT EXISTS / probe-before-ALTER /
/// INSERT OR IGNORE shape).
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 2,
        name: "extract task name dictionary",
        apply: migrate_v2_task_names,
    },
    Migration {
        version: 3,
        name: "create window_positions table",
        apply: migrate_v3_window_positions,
    },
];

/// v1 -> v2: introduce the deduplicated `task_names` dictionary, link
/// sessions to it, and backfill the links from the existing free-text
/// descriptions.
fn migrate_v2_task_names(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS task_names (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );
        "#,
    )?;

    if !column_exists(conn, "time_sessions", "task_name_id")? {
        conn.execute(
            "ALTER TABLE time_sessions ADD COLUMN task_name_id INTEGER REFERENCES task_names(id)",
            [],
        )?;
    }

    // Dictionary rows for every distinct non-empty description.
    conn.execute(
        "INSERT OR IGNORE INTO task_names (name)
         SELECT DISTINCT TRIM(description) FROM time_sessions
         WHERE description IS NOT NULL AND TRIM(description) != ''",
        [],
    )?;

    // Link sessions that are not linked yet.
    conn.execute(
        "UPDATE time_sessions
         SET task_name_id = (SELECT id FROM task_names WHERE name = TRIM(time_sessions.description))
         WHERE task_name_id IS NULL
           AND description IS NOT NULL AND TRIM(description) != ''",
        [],
    )?;

    Ok(())
}

/// v2 -> v3: window geometry cache, keyed by logical window name.
fn migrate_v3_window_positions(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS window_positions (
            name   TEXT PRIMARY KEY,
            x      INTEGER NOT NULL,
            y      INTEGER NOT NULL,
            width  INTEGER NOT NULL,
            height INTEGER NOT NULL
        );
        "#,
    )
}

/// Directory where pre-migration and manual backups live, beside the
/// database file.
pub fn backups_dir(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("backups")
}

/// Timestamped copy of the whole database file. The filename embeds a
/// sortable timestamp so the newest backup lists last.
fn backup_before_migration(db_path: &Path) -> AppResult<PathBuf> {
    let dir = backups_dir(db_path);
    fs::create_dir_all(&dir).map_err(|e| {
        AppError::MigrationBackupFailed(format!("cannot create {}: {}", dir.display(), e))
    })?;

    let stem = db_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "timekeep".to_string());
    let backup = dir.join(format!(
        "{}_pre_migration_{}.db",
        stem,
        Local::now().format("%Y%m%d_%H%M%S")
    ));

    fs::copy(db_path, &backup).map_err(|e| {
        AppError::MigrationBackupFailed(format!("cannot copy to {}: {}", backup.display(), e))
    })?;

    Ok(backup)
}

/// Run every pending migration step. Called from `Db::open` before any
/// other statement may touch the connection.
///
/// `db_path` is None when there is nothing worth protecting (an in-memory
/// database, or a file this very open just created); for pre-existing
/// on-disk databases the backup is mandatory and a backup failure aborts
/// the whole migration with the schema untouched.
pub fn run_pending_migrations(conn: &mut Connection, db_path: Option<&Path>) -> AppResult<()> {
    let from = current_version(conn)?;
    if from >= LATEST_VERSION {
        return Ok(());
    }

    let backup = match db_path {
        Some(path) => {
            warning(format!(
                "Schema at version {} (latest {}), creating safety backup before migrating...",
                from, LATEST_VERSION
            ));
            Some(backup_before_migration(path)?)
        }
        None => None,
    };

    for step in MIGRATIONS.iter().filter(|m| m.version > from) {
        let tx = conn.transaction()?;
        let applied = (step.apply)(&tx).and_then(|_| set_version(&tx, step.version));
        match applied {
            Ok(()) => {
                tx.commit()?;
                success(format!("Migrated to v{}: {}", step.version, step.name));
            }
            Err(e) => {
                // Dropping the transaction rolls this step back; earlier
                // steps stay committed and versioned.
                drop(tx);
                return Err(AppError::MigrationStepFailed {
                    step: step.version,
                    backup: backup.unwrap_or_default(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(())
}
