//! Task/Project Catalog: CRUD over the dictionary tables the session
//! engine references by foreign key.
//!
//! Conflict semantics follow the probe-friendly convention: duplicate
//! unique values return None, guarded deletes return false, and only real
//! database failures surface as errors.

use crate::db::models::{
    Company, Project, TaskName, WorkType, row_to_company, row_to_project, row_to_task_name,
    row_to_work_type,
};
use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, params};

// ---------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------

/// Insert a project. A duplicate name is a caller-recoverable conflict:
/// returns None instead of failing.
pub fn create_project(
    conn: &Connection,
    name: &str,
    color: &str,
    hourly_rate: f64,
    company_id: Option<i64>,
) -> AppResult<Option<i64>> {
    let res = conn.execute(
        "INSERT INTO projects (name, color, hourly_rate, company_id) VALUES (?1, ?2, ?3, ?4)",
        params![name, color, hourly_rate, company_id],
    );
    match res {
        Ok(_) => Ok(Some(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Update every editable project field at once; false on a name
/// collision or missing id.
pub fn update_project(
    conn: &Connection,
    id: i64,
    name: &str,
    color: &str,
    hourly_rate: f64,
    company_id: Option<i64>,
) -> AppResult<bool> {
    let res = conn.execute(
        "UPDATE projects SET name = ?1, color = ?2, hourly_rate = ?3, company_id = ?4
         WHERE id = ?5",
        params![name, color, hourly_rate, company_id, id],
    );
    match res {
        Ok(n) => Ok(n > 0),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub fn update_project_rate(conn: &Connection, id: i64, hourly_rate: f64) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE projects SET hourly_rate = ?1 WHERE id = ?2",
        params![hourly_rate, id],
    )?;
    Ok(n > 0)
}

pub fn list_projects(conn: &Connection) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, color, hourly_rate, company_id FROM projects ORDER BY name",
    )?;
    let rows = stmt.query_map([], row_to_project)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn get_project(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, color, hourly_rate, company_id FROM projects WHERE id = ?1",
    )?;
    Ok(stmt.query_row([id], row_to_project).optional()?)
}

/// Delete a project. While sessions still reference it the delete is
/// refused (false) unless `force`, which explicitly cascades to the
/// referencing sessions first.
pub fn delete_project(conn: &mut Connection, id: i64, force: bool) -> AppResult<bool> {
    let referenced: i64 = conn.query_row(
        "SELECT COUNT(*) FROM time_sessions WHERE project_id = ?1",
        [id],
        |r| r.get(0),
    )?;

    if referenced > 0 && !force {
        return Ok(false);
    }

    let tx = conn.transaction()?;
    if referenced > 0 {
        tx.execute("DELETE FROM time_sessions WHERE project_id = ?1", [id])?;
    }
    let deleted = tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(deleted > 0)
}

// ---------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------

pub fn create_company(conn: &Connection, code: &str, name: &str) -> AppResult<Option<i64>> {
    let res = conn.execute(
        "INSERT INTO companies (code, name) VALUES (?1, ?2)",
        params![code, name],
    );
    match res {
        Ok(_) => Ok(Some(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_companies(conn: &Connection) -> AppResult<Vec<Company>> {
    let mut stmt = conn.prepare_cached("SELECT id, code, name FROM companies ORDER BY name")?;
    let rows = stmt.query_map([], row_to_company)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Guarded delete: refuses (false) while any project references the
/// company; never cascades silently.
pub fn delete_company(conn: &Connection, id: i64) -> AppResult<bool> {
    let referenced: i64 = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE company_id = ?1",
        [id],
        |r| r.get(0),
    )?;
    if referenced > 0 {
        return Ok(false);
    }
    Ok(conn.execute("DELETE FROM companies WHERE id = ?1", [id])? > 0)
}

// ---------------------------------------------------------------------
// Work types
// ---------------------------------------------------------------------

pub fn create_work_type(conn: &Connection, name: &str, description: &str) -> AppResult<Option<i64>> {
    let res = conn.execute(
        "INSERT INTO work_types (name, description) VALUES (?1, ?2)",
        params![name, description],
    );
    match res {
        Ok(_) => Ok(Some(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_work_types(conn: &Connection) -> AppResult<Vec<WorkType>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, name, description FROM work_types ORDER BY name")?;
    let rows = stmt.query_map([], row_to_work_type)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Guarded delete: refuses (false) while any session references the work
/// type.
pub fn delete_work_type(conn: &Connection, id: i64) -> AppResult<bool> {
    let referenced: i64 = conn.query_row(
        "SELECT COUNT(*) FROM time_sessions WHERE work_type_id = ?1",
        [id],
        |r| r.get(0),
    )?;
    if referenced > 0 {
        return Ok(false);
    }
    Ok(conn.execute("DELETE FROM work_types WHERE id = ?1", [id])? > 0)
}

// ---------------------------------------------------------------------
// Task names
// ---------------------------------------------------------------------

/// Resolve the dictionary id for a (trimmed) task description, creating
/// the row on first use. INSERT OR IGNORE followed by a re-query makes
/// this an idempotent upsert-by-read: a uniqueness race resolves to the
/// existing id instead of an error.
pub fn get_or_create_task_name(conn: &Connection, text: &str) -> AppResult<Option<i64>> {
    let name = text.trim();
    if name.is_empty() {
        return Ok(None);
    }

    conn.execute("INSERT OR IGNORE INTO task_names (name) VALUES (?1)", [name])?;
    let id: i64 = conn.query_row("SELECT id FROM task_names WHERE name = ?1", [name], |r| {
        r.get(0)
    })?;
    Ok(Some(id))
}

pub fn get_task_name(conn: &Connection, id: i64) -> AppResult<Option<TaskName>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM task_names WHERE id = ?1")?;
    Ok(stmt.query_row([id], row_to_task_name).optional()?)
}

pub fn list_task_names(conn: &Connection) -> AppResult<Vec<TaskName>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM task_names ORDER BY name")?;
    let rows = stmt.query_map([], row_to_task_name)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Rename a dictionary entry and fan the new text out to the denormalized
/// description of every referencing session, atomically. This is the one
/// place a dictionary edit touches fact rows: historical sessions reflect
/// the rename without a join at read time.
///
/// Renaming onto a name another entry already holds merges into that
/// entry: the sessions move over and the old row is removed, so the
/// dictionary stays unique without surfacing a constraint error.
pub fn rename_task_name(conn: &mut Connection, id: i64, new_text: &str) -> AppResult<bool> {
    let name = new_text.trim();
    if name.is_empty() {
        return Ok(false);
    }

    let tx = conn.transaction()?;
    let holder: Option<i64> = tx
        .query_row("SELECT id FROM task_names WHERE name = ?1", [name], |r| {
            r.get(0)
        })
        .optional()?;

    match holder {
        Some(existing) if existing != id => {
            if get_task_name(&tx, id)?.is_none() {
                return Ok(false); // dropping tx rolls back
            }
            tx.execute(
                "UPDATE time_sessions SET task_name_id = ?1, description = ?2
                 WHERE task_name_id = ?3",
                params![existing, name, id],
            )?;
            tx.execute("DELETE FROM task_names WHERE id = ?1", [id])?;
        }
        _ => {
            let renamed = tx.execute(
                "UPDATE task_names SET name = ?1 WHERE id = ?2",
                params![name, id],
            )?;
            if renamed == 0 {
                return Ok(false);
            }
            tx.execute(
                "UPDATE time_sessions SET description = ?1 WHERE task_name_id = ?2",
                params![name, id],
            )?;
        }
    }
    tx.commit()?;
    Ok(true)
}

// ---------------------------------------------------------------------
// Window positions
// ---------------------------------------------------------------------

/// Last-known geometry for a logical window name. A pure UI convenience
/// cache; it lives here because the table is part of the versioned schema.
pub fn save_window_position(
    conn: &Connection,
    name: &str,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO window_positions (name, x, y, width, height) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(name) DO UPDATE SET
            x = excluded.x, y = excluded.y,
            width = excluded.width, height = excluded.height",
        params![name, x, y, width, height],
    )?;
    Ok(())
}

pub fn get_window_position(
    conn: &Connection,
    name: &str,
) -> AppResult<Option<(i64, i64, i64, i64)>> {
    let mut stmt = conn
        .prepare_cached("SELECT x, y, width, height FROM window_positions WHERE name = ?1")?;
    Ok(stmt
        .query_row([name], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
        .optional()?)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handle::Db;

    #[test]
    fn duplicate_project_name_returns_none() {
        let db = Db::open_in_memory().unwrap();
        let first = create_project(&db.conn, "Acme", "#ff0000", 50.0, None).unwrap();
        assert!(first.is_some());
        let dup = create_project(&db.conn, "Acme", "#00ff00", 10.0, None).unwrap();
        assert!(dup.is_none());
    }

    #[test]
    fn update_project_rewrites_all_fields() {
        let db = Db::open_in_memory().unwrap();
        let company = create_company(&db.conn, "ACM", "Acme Corp").unwrap().unwrap();
        let id = create_project(&db.conn, "Draft", "#0000FF", 0.0, None)
            .unwrap()
            .unwrap();

        assert!(update_project(&db.conn, id, "Final", "#00FF00", 80.0, Some(company)).unwrap());
        let p = get_project(&db.conn, id).unwrap().unwrap();
        assert_eq!(p.name, "Final");
        assert_eq!(p.color, "#00FF00");
        assert_eq!(p.hourly_rate, 80.0);
        assert_eq!(p.company_id, Some(company));

        assert!(!update_project(&db.conn, 9999, "X", "#000000", 0.0, None).unwrap());

        // A name collision is a recoverable conflict, not an error.
        create_project(&db.conn, "Taken", "#0000FF", 0.0, None).unwrap();
        assert!(!update_project(&db.conn, id, "Taken", "#00FF00", 80.0, None).unwrap());
    }

    #[test]
    fn get_or_create_task_name_is_stable() {
        let db = Db::open_in_memory().unwrap();
        let a = get_or_create_task_name(&db.conn, "  Writing docs  ").unwrap();
        let b = get_or_create_task_name(&db.conn, "Writing docs").unwrap();
        assert_eq!(a, b);
        assert!(a.is_some());
        assert_eq!(get_or_create_task_name(&db.conn, "   ").unwrap(), None);
    }

    #[test]
    fn rename_fans_out_to_sessions() {
        let mut db = Db::open_in_memory().unwrap();
        let id = get_or_create_task_name(&db.conn, "Old name").unwrap().unwrap();
        let other = get_or_create_task_name(&db.conn, "Other").unwrap().unwrap();
        db.conn
            .execute_batch(&format!(
                "INSERT INTO time_sessions (description, task_name_id, start_time, end_time, duration) VALUES
                    ('Old name', {id}, '2025-01-10T09:00:00', '2025-01-10T10:00:00', 3600),
                    ('Old name', {id}, '2025-01-11T09:00:00', '2025-01-11T10:00:00', 3600),
                    ('Other', {other}, '2025-01-12T09:00:00', '2025-01-12T10:00:00', 3600);"
            ))
            .unwrap();

        assert!(rename_task_name(&mut db.conn, id, "New name").unwrap());

        let renamed: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM time_sessions WHERE description = 'New name'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(renamed, 2);
        let untouched: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM time_sessions WHERE description = 'Other'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(untouched, 1);

        assert!(!rename_task_name(&mut db.conn, 9999, "Nope").unwrap());
    }

    #[test]
    fn rename_to_existing_name_merges_entries() {
        let mut db = Db::open_in_memory().unwrap();
        let alpha = get_or_create_task_name(&db.conn, "Alpha").unwrap().unwrap();
        let beta = get_or_create_task_name(&db.conn, "Beta").unwrap().unwrap();
        db.conn
            .execute_batch(&format!(
                "INSERT INTO time_sessions (description, task_name_id, start_time, end_time, duration) VALUES
                    ('Alpha', {alpha}, '2025-01-10T09:00:00', '2025-01-10T10:00:00', 3600),
                    ('Beta',  {beta},  '2025-01-11T09:00:00', '2025-01-11T10:00:00', 3600);"
            ))
            .unwrap();

        assert!(rename_task_name(&mut db.conn, alpha, "Beta").unwrap());

        // One surviving entry; both sessions point at it.
        assert!(get_task_name(&db.conn, alpha).unwrap().is_none());
        let entries: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM task_names", [], |r| r.get(0))
            .unwrap();
        assert_eq!(entries, 1);
        let linked: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM time_sessions WHERE task_name_id = ?1 AND description = 'Beta'",
                [beta],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(linked, 2);

        // Renaming an entry onto its own name is an ordinary rename.
        assert!(rename_task_name(&mut db.conn, beta, "Beta").unwrap());
    }

    #[test]
    fn window_position_upserts() {
        let db = Db::open_in_memory().unwrap();
        assert_eq!(get_window_position(&db.conn, "main").unwrap(), None);
        save_window_position(&db.conn, "main", 10, 20, 800, 600).unwrap();
        save_window_position(&db.conn, "main", 15, 25, 800, 600).unwrap();
        assert_eq!(
            get_window_position(&db.conn, "main").unwrap(),
            Some((15, 25, 800, 600))
        );
    }

    #[test]
    fn guarded_deletes() {
        let mut db = Db::open_in_memory().unwrap();
        let company = create_company(&db.conn, "ACM", "Acme Corp").unwrap().unwrap();
        let project = create_project(&db.conn, "Site", "#0000FF", 0.0, Some(company))
            .unwrap()
            .unwrap();
        let wt = create_work_type(&db.conn, "Programming", "")
            .unwrap()
            .unwrap();
        db.conn
            .execute(
                "INSERT INTO time_sessions (project_id, work_type_id, description, start_time, end_time, duration)
                 VALUES (?1, ?2, 'x', '2025-01-10T09:00:00', '2025-01-10T10:00:00', 3600)",
                params![project, wt],
            )
            .unwrap();

        assert!(!delete_company(&db.conn, company).unwrap());
        assert!(!delete_work_type(&db.conn, wt).unwrap());
        assert!(!delete_project(&mut db.conn, project, false).unwrap());

        // Force-cascade removes the sessions, unblocking the others.
        assert!(delete_project(&mut db.conn, project, true).unwrap());
        assert!(delete_company(&db.conn, company).unwrap());
        assert!(delete_work_type(&db.conn, wt).unwrap());
    }
}
