use crate::config::Config;
use crate::core::timer::TimerLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::time::format_duration;

use super::open_db;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut db = open_db(cfg)?;

    if let Some((closed, _)) = TimerLogic::rollover_if_needed(&mut db)? {
        info(format!("Session {} was split at midnight", closed));
    }

    let had_active = TimerLogic::resume_on_startup(&db)?.is_some();
    let duration = TimerLogic::stop(&mut db)?;

    if had_active {
        success(format!("Session stopped after {}", format_duration(duration)));
    } else {
        warning("No running session");
    }
    Ok(())
}
