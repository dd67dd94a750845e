use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::version::{LATEST_VERSION, current_version};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        // Opening the handle already runs pending migrations, so
        // `--migrate` reduces to reporting where the schema landed.
        let db = open_db(cfg)?;
        let version = current_version(&db.conn)?;

        if *migrate {
            if version >= LATEST_VERSION {
                success(format!("Schema up to date (version {})", version));
            } else {
                warning(format!(
                    "Schema still at version {} (latest {})",
                    version, LATEST_VERSION
                ));
            }
        }

        if *check {
            let result: String =
                db.conn
                    .query_row("PRAGMA integrity_check", [], |r| r.get(0))?;
            if result == "ok" {
                success("Integrity check passed");
            } else {
                warning(format!("Integrity check reported: {}", result));
            }
        }

        if *vacuum {
            db.conn.execute_batch("VACUUM")?;
            success("Database vacuumed");
        }

        if *show_info {
            if let Some(path) = &db.path {
                info(format!("Database: {}", path.display()));
            }
            info(format!("Schema version: {}", version));
            let sessions: i64 =
                db.conn
                    .query_row("SELECT COUNT(*) FROM time_sessions", [], |r| r.get(0))?;
            let projects: i64 =
                db.conn
                    .query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))?;
            info(format!("{} sessions across {} projects", sessions, projects));
        }
    }
    Ok(())
}
