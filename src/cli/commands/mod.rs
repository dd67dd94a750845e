pub mod backup;
pub mod company;
pub mod config;
pub mod db;
pub mod del;
pub mod init;
pub mod list;
pub mod paid;
pub mod project;
pub mod restore;
pub mod start;
pub mod status;
pub mod stop;
pub mod task;
pub mod worktype;

use crate::db::Db;
use crate::errors::AppResult;
use std::path::Path;

/// Open the configured database, running any pending migrations.
pub(crate) fn open_db(cfg: &crate::config::Config) -> AppResult<Db> {
    Db::open(Some(Path::new(&cfg.database)))
}
