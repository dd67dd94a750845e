//! Session row operations.
//!
//! Every function takes explicit timestamps; `core::timer` supplies the
//! wall clock. The single-active-session invariant (at most one row with
//! `end_time IS NULL`) is enforced by the orchestration layer through
//! query-before-write; this is a single-process tool with exclusive file
//! access, so no database-level uniqueness constraint backs it up.

use crate::db::catalog::get_or_create_task_name;
use crate::db::models::{Session, row_to_session};
use crate::errors::AppResult;
use crate::utils::time::{elapsed_seconds, format_timestamp};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

const SESSION_COLS: &str =
    "id, project_id, description, task_name_id, work_type_id, start_time, end_time, duration, paid";

pub struct NewSession<'a> {
    pub project_id: Option<i64>,
    pub description: &'a str,
    pub task_name_id: Option<i64>,
    pub work_type_id: Option<i64>,
    pub start_time: NaiveDateTime,
}

/// Insert a running session (`end_time` NULL, duration 0). Returns the
/// new row id.
pub fn insert_session(conn: &Connection, new: &NewSession) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO time_sessions (project_id, description, task_name_id, work_type_id, start_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.project_id,
            new.description,
            new.task_name_id,
            new.work_type_id,
            format_timestamp(new.start_time),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Stop a running session at `end`: writes `end_time` and the computed
/// whole-second duration (clamped to zero on clock skew) and returns the
/// duration. A missing or already-stopped id is a no-op returning 0, so
/// stop is idempotent.
pub fn stop_session(conn: &Connection, id: i64, end: NaiveDateTime) -> AppResult<i64> {
    let running = get_session(conn, id)?.filter(Session::is_running);
    let Some(session) = running else {
        return Ok(0);
    };

    let duration = elapsed_seconds(session.start_time, end);
    conn.execute(
        "UPDATE time_sessions SET end_time = ?1, duration = ?2 WHERE id = ?3",
        params![format_timestamp(end), duration, id],
    )?;
    Ok(duration)
}

pub fn get_session(conn: &Connection, id: i64) -> AppResult<Option<Session>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SESSION_COLS} FROM time_sessions WHERE id = ?1"
    ))?;
    Ok(stmt.query_row([id], row_to_session).optional()?)
}

/// The active session, if any: the single row with a NULL `end_time`.
/// Ordered defensively so a corrupted database with several open rows
/// still yields the most recent one.
pub fn active_session(conn: &Connection) -> AppResult<Option<Session>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SESSION_COLS} FROM time_sessions
         WHERE end_time IS NULL
         ORDER BY start_time DESC
         LIMIT 1"
    ))?;
    Ok(stmt.query_row([], row_to_session).optional()?)
}

pub fn delete_session(conn: &Connection, id: i64) -> AppResult<bool> {
    Ok(conn.execute("DELETE FROM time_sessions WHERE id = ?1", [id])? > 0)
}

pub fn mark_session_paid(conn: &Connection, id: i64) -> AppResult<bool> {
    Ok(conn.execute("UPDATE time_sessions SET paid = 1 WHERE id = ?1", [id])? > 0)
}

/// Rewrite a session's description. The dictionary link follows the text:
/// the new description is resolved (or created) in `task_names`, so the
/// denormalized column never drifts from its entry.
pub fn update_session_description(conn: &Connection, id: i64, description: &str) -> AppResult<bool> {
    if get_session(conn, id)?.is_none() {
        return Ok(false);
    }
    let task_name_id = get_or_create_task_name(conn, description)?;
    let n = conn.execute(
        "UPDATE time_sessions SET description = ?1, task_name_id = ?2 WHERE id = ?3",
        params![description.trim(), task_name_id, id],
    )?;
    Ok(n > 0)
}

pub fn update_session_project(conn: &Connection, id: i64, project_id: Option<i64>) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE time_sessions SET project_id = ?1 WHERE id = ?2",
        params![project_id, id],
    )?;
    Ok(n > 0)
}

/// Most recent non-empty description previously used for a project; the
/// start-with-empty-description fallback reads this before resorting to
/// the configured default label.
pub fn last_description_for_project(
    conn: &Connection,
    project_id: i64,
) -> AppResult<Option<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT description FROM time_sessions
         WHERE project_id = ?1 AND description IS NOT NULL AND description != ''
         ORDER BY start_time DESC
         LIMIT 1",
    )?;
    Ok(stmt
        .query_row([project_id], |r| r.get::<_, String>(0))
        .optional()?)
}
