use crate::cli::commands::achievements::announce_unlocks;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{SessionLogic, SettingsLogic};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::session::NewSession;
use crate::ui::messages::success;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::date::parse_flexible;
use crate::utils::secs2readable;
use chrono::Utc;

/// Record a finished session.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        push_ups,
        duration,
        date,
        goal,
    } = cmd
    {
        let clock = SystemClock;
        let when = match date {
            Some(s) => parse_flexible(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))?,
            None => clock.now().with_timezone(&Utc),
        };

        let mut pool = DbPool::open(&cfg.database)?;

        let goal = match goal {
            Some(g) => *g,
            None => SettingsLogic::get_settings(&mut pool)?.daily_goal,
        };

        let session = NewSession::new(when, *push_ups, *duration).with_goal(goal);
        let id = SessionLogic::save_session(&mut pool, &session)?;

        success(format!(
            "Session #{} saved: {} push-ups in {}",
            id,
            push_ups,
            secs2readable(*duration as u64)
        ));

        announce_unlocks(&mut pool, &clock)?;
    }

    Ok(())
}
