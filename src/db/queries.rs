//! Caller-facing query surface: filtered session listings and aggregates.
//!
//! Every filter buckets sessions purely by the date of their own
//! `start_time`. Day-boundary rollover keeps each session inside a single
//! calendar day, so no query ever needs to split an interval across
//! midnight.

use crate::db::models::{SessionView, row_to_session_view};
use crate::errors::AppResult;
use chrono::{Days, NaiveDate};
use rusqlite::{Connection, ToSql};

/// Inclusive date range plus an optional project restriction.
#[derive(Debug, Clone, Copy)]
pub struct SessionFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub project_id: Option<i64>,
}

impl SessionFilter {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
            project_id: None,
        }
    }

    /// The last 7 calendar days ending at `today`.
    pub fn week(today: NaiveDate) -> Self {
        Self {
            from: today.checked_sub_days(Days::new(6)).unwrap_or(today),
            to: today,
            project_id: None,
        }
    }

    /// The last 30 calendar days ending at `today`.
    pub fn month(today: NaiveDate) -> Self {
        Self {
            from: today.checked_sub_days(Days::new(29)).unwrap_or(today),
            to: today,
            project_id: None,
        }
    }

    pub fn range(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            project_id: None,
        }
    }

    pub fn for_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

fn filter_clause(filter: &SessionFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut sql = String::from(" WHERE date(s.start_time) BETWEEN date(?1) AND date(?2)");
    let mut params: Vec<Box<dyn ToSql>> = vec![
        Box::new(filter.from.format("%Y-%m-%d").to_string()),
        Box::new(filter.to.format("%Y-%m-%d").to_string()),
    ];
    if let Some(pid) = filter.project_id {
        sql.push_str(" AND s.project_id = ?3");
        params.push(Box::new(pid));
    }
    (sql, params)
}

/// Sessions matching the filter, newest first, joined with their project
/// and a derived cost column (hours x hourly rate, 0 for unbilled
/// projects).
pub fn list_sessions(conn: &Connection, filter: &SessionFilter) -> AppResult<Vec<SessionView>> {
    let (clause, params) = filter_clause(filter);
    let sql = format!(
        "SELECT s.id, s.project_id, s.description, s.task_name_id, s.work_type_id,
                s.start_time, s.end_time, s.duration, s.paid,
                p.name AS project_name, p.color AS project_color, p.hourly_rate,
                CASE WHEN p.hourly_rate > 0 THEN (s.duration / 3600.0) * p.hourly_rate ELSE 0 END AS cost
         FROM time_sessions s
         LEFT JOIN projects p ON s.project_id = p.id
         {clause}
         ORDER BY s.start_time DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), row_to_session_view)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Total tracked seconds for the filter.
pub fn total_seconds(conn: &Connection, filter: &SessionFilter) -> AppResult<i64> {
    let (clause, params) = filter_clause(filter);
    let sql = format!(
        "SELECT IFNULL(SUM(s.duration), 0) FROM time_sessions s {clause}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let total: i64 = stmt.query_row(param_refs.as_slice(), |r| r.get(0))?;
    Ok(total)
}

/// Total billable cost for the filter (sessions on unbilled projects or
/// without a project contribute nothing).
pub fn total_cost(conn: &Connection, filter: &SessionFilter) -> AppResult<f64> {
    let (clause, params) = filter_clause(filter);
    let sql = format!(
        "SELECT IFNULL(SUM(CASE WHEN p.hourly_rate > 0
                                THEN (s.duration / 3600.0) * p.hourly_rate
                                ELSE 0 END), 0)
         FROM time_sessions s
         LEFT JOIN projects p ON s.project_id = p.id
         {clause}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let total: f64 = stmt.query_row(param_refs.as_slice(), |r| r.get(0))?;
    Ok(total)
}
