use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::Db;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::path::Path;

/// Create the configuration file (unless in test mode) and initialize the
/// database schema at the latest version.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    let db = Db::open(Some(Path::new(&cfg.database)))?;
    if let Some(path) = &db.path {
        success(format!("Database ready: {}", path.display()));
    }
    if !cli.test {
        success(format!("Config file:    {}", Config::config_file().display()));
    }
    Ok(())
}
