//! Unified application error type.
//! All modules (db, core, cli, config) return AppError so error handling
//! stays consistent across the crate.
//!
//! Recoverable "did not find it" conditions are deliberately NOT errors:
//! callers probe optimistically (is there an active session? does this
//! project exist?), so those paths return Option / bool / 0 instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// No writable location for the database file could be resolved.
    /// Fatal at startup; there is no further fallback.
    #[error("No writable location for the database: {0}")]
    StorageUnavailable(String),

    /// The pre-migration backup could not be written. The database is
    /// left untouched at its old schema version.
    #[error("Pre-migration backup failed, database left unmodified: {0}")]
    MigrationBackupFailed(String),

    /// A migration step failed and was rolled back. The version stays at
    /// the last successfully applied step; `backup` can restore the
    /// pre-migration state manually.
    #[error(
        "Migration step to version {step} failed and was rolled back (restore from {}): {reason}",
        backup.display()
    )]
    MigrationStepFailed {
        step: u32,
        backup: PathBuf,
        reason: String,
    },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Backup / restore
    // ---------------------------
    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Restore error: {0}")]
    Restore(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
