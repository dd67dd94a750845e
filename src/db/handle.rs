//! Storage Handle: owns the single connection to the database file.
//!
//! `Db::open` resolves a writable location, creates the file if absent,
//! ensures the base tables exist and runs pending migrations before
//! returning, so no caller can issue a query against an un-migrated schema.

use crate::db::migrate::run_pending_migrations;
use crate::db::schema::ensure_base_tables;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Result, Transaction};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_NAME: &str = "timekeep.sqlite";

pub struct Db {
    pub conn: Connection,
    pub path: Option<PathBuf>,
}

/// A directory counts as writable only if we can actually create and
/// remove a file in it (the app may live inside a read-only bundle).
fn dir_writable(dir: &Path) -> bool {
    if fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_test");
    match fs::write(&probe, "ok") {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

/// Prefer the working directory; fall back to the per-user data dir.
fn resolve_default_dir() -> AppResult<PathBuf> {
    if let Ok(cwd) = env::current_dir()
        && dir_writable(&cwd)
    {
        return Ok(cwd);
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::StorageUnavailable("no per-user data directory".into()))?
        .join("timekeep");
    if dir_writable(&data_dir) {
        return Ok(data_dir);
    }

    Err(AppError::StorageUnavailable(format!(
        "neither the working directory nor {} is writable",
        data_dir.display()
    )))
}

impl Db {
    /// Open (creating if absent) the database at `path_hint`, or at the
    /// default resolved location when no hint is given.
    pub fn open(path_hint: Option<&Path>) -> AppResult<Db> {
        let path = match path_hint {
            Some(p) => {
                if let Some(parent) = p.parent()
                    && !parent.as_os_str().is_empty()
                    && !dir_writable(parent)
                {
                    return Err(AppError::StorageUnavailable(format!(
                        "{} is not writable",
                        parent.display()
                    )));
                }
                p.to_path_buf()
            }
            None => resolve_default_dir()?.join(DEFAULT_DB_NAME),
        };

        // A file created by this very open has nothing worth a backup:
        // only pre-existing databases get the pre-migration copy.
        let existed = path.exists();

        let mut conn = Connection::open(&path)?;
        ensure_base_tables(&conn)?;
        run_pending_migrations(&mut conn, existed.then_some(path.as_path()))?;

        Ok(Db {
            conn,
            path: Some(path),
        })
    }

    /// In-memory database with the full schema applied; used by tests and
    /// never backed by a file.
    pub fn open_in_memory() -> AppResult<Db> {
        let mut conn = Connection::open_in_memory()?;
        ensure_base_tables(&conn)?;
        run_pending_migrations(&mut conn, None)?;
        Ok(Db { conn, path: None })
    }

    /// Atomic multi-statement block.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction()
    }

    /// Helper to run a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        func(&mut self.conn)
    }
}
