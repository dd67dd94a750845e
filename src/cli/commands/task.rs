use crate::cli::parser::TaskCmd;
use crate::config::Config;
use crate::db::catalog;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

use super::open_db;

pub fn handle(cmd: &TaskCmd, cfg: &Config) -> AppResult<()> {
    let mut db = open_db(cfg)?;

    match cmd {
        TaskCmd::List => {
            for t in catalog::list_task_names(&db.conn)? {
                println!("{:>4}  {}", t.id, t.name);
            }
        }
        TaskCmd::Rename { id, name } => {
            if catalog::rename_task_name(&mut db.conn, *id, name)? {
                success(format!(
                    "Task {} renamed to '{}' (sessions updated)",
                    id, name
                ));
            } else {
                warning(format!("No task with id {}", id));
            }
        }
    }
    Ok(())
}
