use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::ui::messages::info;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Restore { file } = cmd {
        BackupLogic::restore(Path::new(&cfg.database), Path::new(file))?;
        info("The restored database will be used on the next run");
    }
    Ok(())
}
