use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::AchievementLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, success};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::colors::{GREEN, GREY, RESET};
use crate::utils::formatting::pad_right;
use chrono::Local;

/// Unlocks whatever the current history earns and prints the new ones.
pub(crate) fn announce_unlocks(pool: &mut DbPool, clock: &dyn Clock) -> AppResult<()> {
    for a in AchievementLogic::evaluate_and_unlock(pool, clock)? {
        success(format!("🏆 Achievement unlocked: {} {} ({})", a.icon, a.name, a.description));
    }
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Achievements) {
        let mut pool = DbPool::open(&cfg.database)?;
        announce_unlocks(&mut pool, &SystemClock)?;

        let all = AchievementLogic::list(&mut pool)?;
        let unlocked = all.iter().filter(|a| a.unlocked).count();
        header(format!("Achievements ({}/{})", unlocked, all.len()));

        let width = all.iter().map(|a| a.name.chars().count()).max().unwrap_or(0);
        for a in &all {
            match a.unlocked_date {
                Some(at) if a.unlocked => println!(
                    "{}{} {}  {}  unlocked {}{}",
                    GREEN,
                    a.icon,
                    pad_right(&a.name, width),
                    a.description,
                    at.with_timezone(&Local).format("%Y-%m-%d"),
                    RESET
                ),
                _ => println!(
                    "{}🔒 {}  {}{}",
                    GREY,
                    pad_right(&a.name, width),
                    a.description,
                    RESET
                ),
            }
        }
    }

    Ok(())
}
