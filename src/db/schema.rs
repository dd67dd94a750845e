//! Base-table creation.
//!
//! Only the version-1 schema lives here; everything newer (the task_names
//! dictionary, the `task_name_id` column, window_positions) is created by
//! the migration steps in `db::migrate`, so an old database file walks the
//! same path as a fresh one.

use rusqlite::{Connection, OptionalExtension, Result};

/// Idempotently create every table the version-1 schema carried.
pub fn ensure_base_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            code  TEXT NOT NULL UNIQUE,
            name  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            color       TEXT DEFAULT '#0000FF',
            hourly_rate REAL DEFAULT 0,
            company_id  INTEGER,
            created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (company_id) REFERENCES companies (id)
        );

        CREATE TABLE IF NOT EXISTS work_types (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            description TEXT DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS time_sessions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id   INTEGER,
            description  TEXT,
            work_type_id INTEGER,
            start_time   TIMESTAMP NOT NULL,
            end_time     TIMESTAMP,
            duration     INTEGER DEFAULT 0,
            paid         INTEGER DEFAULT 0,
            FOREIGN KEY (project_id) REFERENCES projects (id),
            FOREIGN KEY (work_type_id) REFERENCES work_types (id)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_start ON time_sessions(start_time);
        CREATE INDEX IF NOT EXISTS idx_sessions_project ON time_sessions(project_id);
        "#,
    )
}

/// Check whether a table exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare_cached("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let found: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(found.is_some())
}

/// Check whether a column exists on a table (SQLite has no
/// `ADD COLUMN IF NOT EXISTS`, so migrations probe first).
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn base_tables_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_base_tables(&conn).unwrap();
        ensure_base_tables(&conn).unwrap();
        assert!(table_exists(&conn, "projects").unwrap());
        assert!(table_exists(&conn, "time_sessions").unwrap());
        assert!(!table_exists(&conn, "task_names").unwrap());
    }

    #[test]
    fn column_probe() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_base_tables(&conn).unwrap();
        assert!(column_exists(&conn, "time_sessions", "paid").unwrap());
        assert!(!column_exists(&conn, "time_sessions", "task_name_id").unwrap());
    }
}
