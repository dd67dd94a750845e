use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::session::mark_session_paid;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Paid { id } = cmd {
        let db = open_db(cfg)?;
        if mark_session_paid(&db.conn, *id)? {
            success(format!("Session {} marked as paid", id));
        } else {
            warning(format!("No session with id {}", id));
        }
    }
    Ok(())
}
