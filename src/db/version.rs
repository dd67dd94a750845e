//! Schema Version Manager.
//!
//! Tracks a single-row monotonic version marker and decides whether a
//! migration is due. It never decides *what* a step does; that lives in
//! `db::migrate`.

use crate::db::schema::table_exists;
use chrono::Utc;
use rusqlite::{Connection, Result, params};

/// Highest schema version this build knows how to produce.
pub const LATEST_VERSION: u32 = 3;

/// Where the on-disk schema stands relative to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    /// No version marker at all: a legacy database, implicitly version 1.
    Unversioned,
    /// Marker present but behind `LATEST_VERSION`.
    AtVersion(u32),
    UpToDate,
}

fn ensure_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id         INTEGER PRIMARY KEY CHECK (id = 1),
            version    INTEGER NOT NULL,
            applied_at TEXT NOT NULL
        );
        "#,
    )
}

/// Current schema version. Absence of the marker table (or of its row)
/// means a legacy database at implicit version 1.
pub fn current_version(conn: &Connection) -> Result<u32> {
    if !table_exists(conn, "schema_version")? {
        return Ok(1);
    }
    let v: Option<u32> = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |r| {
            r.get(0)
        })
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;
    Ok(v.unwrap_or(1))
}

/// Record `version` as the highest applied migration. Creates the marker
/// table if absent and upserts the single row with a timestamp. Callers
/// run this inside the same transaction as the step's data changes.
pub fn set_version(conn: &Connection, version: u32) -> Result<()> {
    ensure_version_table(conn)?;
    conn.execute(
        "INSERT INTO schema_version (id, version, applied_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET version = excluded.version, applied_at = excluded.applied_at",
        params![version, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn state(conn: &Connection) -> Result<VersionState> {
    if !table_exists(conn, "schema_version")? {
        return Ok(VersionState::Unversioned);
    }
    let v = current_version(conn)?;
    if v >= LATEST_VERSION {
        Ok(VersionState::UpToDate)
    } else {
        Ok(VersionState::AtVersion(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn missing_table_is_implicit_v1() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn).unwrap(), 1);
        assert_eq!(state(&conn).unwrap(), VersionState::Unversioned);
    }

    #[test]
    fn set_version_upserts_single_row() {
        let conn = Connection::open_in_memory().unwrap();
        set_version(&conn, 2).unwrap();
        assert_eq!(current_version(&conn).unwrap(), 2);
        assert_eq!(state(&conn).unwrap(), VersionState::AtVersion(2));

        set_version(&conn, 3).unwrap();
        assert_eq!(current_version(&conn).unwrap(), 3);
        assert_eq!(state(&conn).unwrap(), VersionState::UpToDate);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
