use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ExportLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::clock::SystemClock;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let mut pool = DbPool::open(&cfg.database)?;
        ExportLogic::export(&mut pool, *format, file, *force, &SystemClock)?;
    }
    Ok(())
}
