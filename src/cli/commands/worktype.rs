use crate::cli::parser::WorktypeCmd;
use crate::config::Config;
use crate::db::catalog;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

use super::open_db;

pub fn handle(cmd: &WorktypeCmd, cfg: &Config) -> AppResult<()> {
    let db = open_db(cfg)?;

    match cmd {
        WorktypeCmd::Add { name, desc } => {
            match catalog::create_work_type(&db.conn, name, desc)? {
                Some(id) => success(format!("Work type '{}' created (id {})", name, id)),
                None => warning(format!("A work type named '{}' already exists", name)),
            }
        }
        WorktypeCmd::List => {
            for wt in catalog::list_work_types(&db.conn)? {
                println!("{:>4}  {:<30} {}", wt.id, wt.name, wt.description);
            }
        }
        WorktypeCmd::Del { id } => {
            if catalog::delete_work_type(&db.conn, *id)? {
                success(format!("Work type {} deleted", id));
            } else {
                warning(format!(
                    "Work type {} not deleted (sessions still reference it)",
                    id
                ));
            }
        }
    }
    Ok(())
}
