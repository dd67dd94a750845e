use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timer::TimerLogic;
use crate::db::session::get_session;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start {
        description,
        project,
        worktype,
    } = cmd
    {
        let mut db = open_db(cfg)?;

        // A session left running across midnight is split before anything
        // else happens; the CLI has no periodic tick, so interactions run
        // the rollover check.
        if let Some((closed, _)) = TimerLogic::rollover_if_needed(&mut db)? {
            info(format!("Session {} was split at midnight", closed));
        }

        let id = TimerLogic::start(
            &mut db,
            cfg,
            *project,
            description.as_deref().unwrap_or(""),
            *worktype,
        )?;

        let session = get_session(&db.conn, id)?;
        match session {
            Some(s) => success(format!("Session {} started: {}", id, s.description)),
            None => success(format!("Session {} started", id)),
        }
    }
    Ok(())
}
