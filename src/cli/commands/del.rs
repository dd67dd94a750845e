use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::session::delete_session;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id } = cmd {
        let db = open_db(cfg)?;
        if delete_session(&db.conn, *id)? {
            success(format!("Session {} deleted", id));
        } else {
            warning(format!("No session with id {}", id));
        }
    }
    Ok(())
}
