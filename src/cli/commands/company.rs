use crate::cli::parser::CompanyCmd;
use crate::config::Config;
use crate::db::catalog;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

use super::open_db;

pub fn handle(cmd: &CompanyCmd, cfg: &Config) -> AppResult<()> {
    let db = open_db(cfg)?;

    match cmd {
        CompanyCmd::Add { code, name } => {
            match catalog::create_company(&db.conn, code, name)? {
                Some(id) => success(format!("Company '{}' created (id {})", name, id)),
                None => warning(format!("A company with code '{}' already exists", code)),
            }
        }
        CompanyCmd::List => {
            for c in catalog::list_companies(&db.conn)? {
                println!("{:>4}  {:<8} {}", c.id, c.code, c.name);
            }
        }
        CompanyCmd::Del { id } => {
            if catalog::delete_company(&db.conn, *id)? {
                success(format!("Company {} deleted", id));
            } else {
                warning(format!(
                    "Company {} not deleted (projects still reference it)",
                    id
                ));
            }
        }
    }
    Ok(())
}
