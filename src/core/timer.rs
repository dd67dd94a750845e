//! Session lifecycle orchestration: start/stop/resume plus the
//! day-boundary rollover. The row-level operations live in `db::session`;
//! this layer owns the single-active-session invariant and the wall clock.

use crate::config::Config;
use crate::db::Db;
use crate::db::catalog::get_or_create_task_name;
use crate::db::models::Session;
use crate::db::session::{
    NewSession, active_session, insert_session, last_description_for_project, stop_session,
};
use crate::errors::AppResult;
use crate::utils::time::{end_of_day, start_of_day};
use chrono::{Local, NaiveDateTime};

pub struct TimerLogic;

impl TimerLogic {
    /// Start a new session at `now`.
    ///
    /// An empty description is substituted with the most recent non-empty
    /// description used for the project, falling back to the configured
    /// default label. Starting while another session is running stops the
    /// running one first, so at most one open session ever exists.
    pub fn start_at(
        db: &mut Db,
        cfg: &Config,
        project_id: Option<i64>,
        description: &str,
        work_type_id: Option<i64>,
        now: NaiveDateTime,
    ) -> AppResult<i64> {
        if let Some(running) = active_session(&db.conn)? {
            stop_session(&db.conn, running.id, now)?;
        }

        let trimmed = description.trim();
        let description = if trimmed.is_empty() {
            match project_id {
                Some(pid) => last_description_for_project(&db.conn, pid)?
                    .unwrap_or_else(|| cfg.default_description.clone()),
                None => cfg.default_description.clone(),
            }
        } else {
            trimmed.to_string()
        };

        let task_name_id = get_or_create_task_name(&db.conn, &description)?;
        insert_session(
            &db.conn,
            &NewSession {
                project_id,
                description: &description,
                task_name_id,
                work_type_id,
                start_time: now,
            },
        )
    }

    pub fn start(
        db: &mut Db,
        cfg: &Config,
        project_id: Option<i64>,
        description: &str,
        work_type_id: Option<i64>,
    ) -> AppResult<i64> {
        Self::start_at(db, cfg, project_id, description, work_type_id, Local::now().naive_local())
    }

    /// Stop the active session at `now`; returns the stored duration, 0
    /// when nothing was running.
    pub fn stop_at(db: &mut Db, now: NaiveDateTime) -> AppResult<i64> {
        match active_session(&db.conn)? {
            Some(running) => stop_session(&db.conn, running.id, now),
            None => Ok(0),
        }
    }

    pub fn stop(db: &mut Db) -> AppResult<i64> {
        Self::stop_at(db, Local::now().naive_local())
    }

    /// Rehydrate the caller's running-timer context after a restart: the
    /// session left open by a previous process, if any.
    pub fn resume_on_startup(db: &Db) -> AppResult<Option<Session>> {
        active_session(&db.conn)
    }

    /// Split the active session when it has crossed a calendar-day
    /// boundary: close it at 23:59:59 of its start date and open a new
    /// session for the same project/description at 00:00:00 of the
    /// current date. Returns the (closed, opened) ids when a split
    /// happened.
    ///
    /// Every session therefore stays inside one calendar day, which the
    /// by-day/week/month aggregations rely on.
    pub fn rollover_at(db: &mut Db, now: NaiveDateTime) -> AppResult<Option<(i64, i64)>> {
        let Some(running) = active_session(&db.conn)? else {
            return Ok(None);
        };
        if running.start_time.date() == now.date() {
            return Ok(None);
        }

        stop_session(&db.conn, running.id, end_of_day(running.start_time.date()))?;

        let new_id = insert_session(
            &db.conn,
            &NewSession {
                project_id: running.project_id,
                description: &running.description,
                task_name_id: running.task_name_id,
                work_type_id: running.work_type_id,
                start_time: start_of_day(now.date()),
            },
        )?;

        Ok(Some((running.id, new_id)))
    }

    pub fn rollover_if_needed(db: &mut Db) -> AppResult<Option<(i64, i64)>> {
        Self::rollover_at(db, Local::now().naive_local())
    }
}
