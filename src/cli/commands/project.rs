use crate::cli::parser::ProjectCmd;
use crate::config::Config;
use crate::db::catalog;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

use super::open_db;

pub fn handle(cmd: &ProjectCmd, cfg: &Config) -> AppResult<()> {
    let mut db = open_db(cfg)?;

    match cmd {
        ProjectCmd::Add {
            name,
            color,
            rate,
            company,
        } => match catalog::create_project(&db.conn, name, color, *rate, *company)? {
            Some(id) => success(format!("Project '{}' created (id {})", name, id)),
            None => warning(format!("A project named '{}' already exists", name)),
        },
        ProjectCmd::List => {
            for p in catalog::list_projects(&db.conn)? {
                let rate = if p.hourly_rate > 0.0 {
                    format!("{:.2}/h", p.hourly_rate)
                } else {
                    "unbilled".to_string()
                };
                println!("{:>4}  {:<30} {}  {}", p.id, p.name, p.color, rate);
            }
        }
        ProjectCmd::Rate { id, rate } => {
            if catalog::update_project_rate(&db.conn, *id, *rate)? {
                success(format!("Project {} rate set to {:.2}", id, rate));
            } else {
                warning(format!("No project with id {}", id));
            }
        }
        ProjectCmd::Del { id, force } => {
            if catalog::delete_project(&mut db.conn, *id, *force)? {
                success(format!("Project {} deleted", id));
            } else {
                warning(format!(
                    "Project {} not deleted (sessions still reference it; use --force to cascade)",
                    id
                ));
            }
        }
    }
    Ok(())
}
