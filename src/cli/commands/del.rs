use crate::cli::commands::ask_confirmation;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::DeleteLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::clock::SystemClock;
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del {
        id,
        date: date_str,
        older_than,
        all,
    } = cmd
    {
        let mut pool = DbPool::open(&cfg.database)?;

        if !id.is_empty() {
            if let [single] = id.as_slice() {
                if DeleteLogic::delete_session(&mut pool, *single)? {
                    success(format!("Session #{} has been deleted.", single));
                } else {
                    warning(format!("Session #{} not found.", single));
                }
            } else {
                let n = DeleteLogic::delete_sessions(&mut pool, id)?;
                success(format!("{} of {} sessions deleted.", n, id.len()));
            }
            return Ok(());
        }

        if let Some(d) = date_str {
            let day = date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?;
            if !ask_confirmation(&format!("Delete ALL sessions of {}?", day)) {
                info("Operation cancelled.");
                return Ok(());
            }
            let n = DeleteLogic::delete_sessions_on_date(&mut pool, day)?;
            success(format!("{} sessions of {} deleted.", n, day));
            return Ok(());
        }

        if let Some(days) = older_than {
            if !ask_confirmation(&format!("Delete sessions older than {} days?", days)) {
                info("Operation cancelled.");
                return Ok(());
            }
            let n = DeleteLogic::delete_sessions_older_than(&mut pool, *days, &SystemClock)?;
            success(format!("{} sessions older than {} days deleted.", n, days));
            return Ok(());
        }

        if *all {
            if !ask_confirmation("Delete ALL sessions and achievements? Settings are kept.") {
                info("Operation cancelled.");
                return Ok(());
            }
            let n = DeleteLogic::clear_all_sessions(&mut pool)?;
            success(format!("All sessions deleted ({}).", n));
        }
    }

    Ok(())
}
