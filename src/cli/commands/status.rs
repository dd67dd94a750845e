use crate::config::Config;
use crate::core::timer::TimerLogic;
use crate::db::catalog::get_project;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::{elapsed_seconds, format_duration};
use chrono::Local;

use super::open_db;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut db = open_db(cfg)?;

    if let Some((closed, _)) = TimerLogic::rollover_if_needed(&mut db)? {
        info(format!("Session {} was split at midnight", closed));
    }

    match TimerLogic::resume_on_startup(&db)? {
        Some(session) => {
            let elapsed = elapsed_seconds(session.start_time, Local::now().naive_local());
            let project = match session.project_id {
                Some(pid) => get_project(&db.conn, pid)?
                    .map(|p| p.name)
                    .unwrap_or_else(|| format!("project {}", pid)),
                None => "(no project)".to_string(),
            };
            info(format!(
                "Running: [{}] {} ({} elapsed, session {})",
                project,
                session.description,
                format_duration(elapsed),
                session.id
            ));
        }
        None => info("No running session"),
    }
    Ok(())
}
