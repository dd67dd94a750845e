//! Row structs and rusqlite row mappers for the catalog and session tables.

use crate::utils::time::parse_timestamp;
use chrono::NaiveDateTime;
use rusqlite::{Result, Row};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub hourly_rate: f64,
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Company {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkType {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskName {
    pub id: i64,
    pub name: String,
}

/// One timed work interval. `end_time` is None while the session is
/// running; `duration` stays 0 until the session is stopped.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i64,
    pub project_id: Option<i64>,
    pub description: String,
    pub task_name_id: Option<i64>,
    pub work_type_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration: i64,
    pub paid: bool,
}

impl Session {
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Session joined with its project for display: the caller-facing query
/// surface returns these so the UI layer never joins at read time.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub project_name: Option<String>,
    pub project_color: Option<String>,
    pub hourly_rate: f64,
    pub cost: f64,
}

fn bad_timestamp(s: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        format!("invalid timestamp: {}", s).into(),
    )
}

pub(crate) fn row_to_project(row: &Row) -> Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        hourly_rate: row.get::<_, Option<f64>>("hourly_rate")?.unwrap_or(0.0),
        company_id: row.get("company_id")?,
    })
}

pub(crate) fn row_to_company(row: &Row) -> Result<Company> {
    Ok(Company {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
    })
}

pub(crate) fn row_to_work_type(row: &Row) -> Result<WorkType> {
    Ok(WorkType {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
    })
}

pub(crate) fn row_to_task_name(row: &Row) -> Result<TaskName> {
    Ok(TaskName {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

pub(crate) fn row_to_session(row: &Row) -> Result<Session> {
    let start_raw: String = row.get("start_time")?;
    let start_time = parse_timestamp(&start_raw).ok_or_else(|| bad_timestamp(&start_raw))?;

    let end_time = match row.get::<_, Option<String>>("end_time")? {
        Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| bad_timestamp(&raw))?),
        None => None,
    };

    Ok(Session {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
        task_name_id: row.get("task_name_id")?,
        work_type_id: row.get("work_type_id")?,
        start_time,
        end_time,
        duration: row.get::<_, Option<i64>>("duration")?.unwrap_or(0),
        paid: row.get::<_, Option<i64>>("paid")?.unwrap_or(0) == 1,
    })
}

pub(crate) fn row_to_session_view(row: &Row) -> Result<SessionView> {
    let session = row_to_session(row)?;
    Ok(SessionView {
        project_name: row.get("project_name")?,
        project_color: row.get("project_color")?,
        hourly_rate: row.get::<_, Option<f64>>("hourly_rate")?.unwrap_or(0.0),
        cost: row.get::<_, Option<f64>>("cost")?.unwrap_or(0.0),
        session,
    })
}
