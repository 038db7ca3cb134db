use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

/// `log --print [--op NAME] [--last N]`
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log {
        print,
        operation,
        last,
    } = cmd
    else {
        return Ok(());
    };

    if !*print {
        info("Nothing to show: add --print.");
        return Ok(());
    }

    let mut pool = DbPool::open(&cfg.database)?;
    LogLogic::print_log(&mut pool, operation.as_deref(), *last)
}
