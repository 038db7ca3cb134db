use crate::cli::commands::ask_confirmation;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::DeleteLogic;
use crate::core::reminder::{LogScheduler, ReminderScheduler};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reset { force } = cmd {
        if !*force
            && !ask_confirmation("Erase every session, achievement and setting? This cannot be undone.")
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut pool = DbPool::open(&cfg.database)?;
        DeleteLogic::reset_everything(&mut pool)?;
        // Default settings carry no reminder.
        LogScheduler::new(&pool.conn).cancel_all()?;
        success("All data erased. Default settings restored.");
    }
    Ok(())
}
