use crate::core::stats::{current_streak, total_push_ups};
use crate::db::achievements::{load_unlocked, mark_unlocked};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries::load_all_sessions;
use crate::errors::AppResult;
use crate::models::achievement::{Achievement, AchievementDef, CATALOG};
use crate::models::session::WorkoutSession;
use crate::utils::clock::Clock;
use chrono::{NaiveDate, Utc};

/// Catalog entries whose condition holds for this history.
pub fn satisfied(sessions: &[WorkoutSession], today: NaiveDate) -> Vec<&'static AchievementDef> {
    let total = total_push_ups(sessions);
    let streak = current_streak(sessions, today);
    CATALOG
        .iter()
        .filter(|d| d.condition.is_met(total, streak, sessions))
        .collect()
}

pub struct AchievementLogic;

impl AchievementLogic {
    /// Full catalog with the stored unlock state.
    pub fn list(pool: &mut DbPool) -> AppResult<Vec<Achievement>> {
        let unlocked = load_unlocked(&pool.conn)?;
        Ok(CATALOG
            .iter()
            .map(|d| Achievement::from_def(d, unlocked.get(d.id).copied()))
            .collect())
    }

    /// Unlocks every newly satisfied achievement and returns those.
    /// Already unlocked achievements stay unlocked even if no longer satisfied.
    pub fn evaluate_and_unlock(pool: &mut DbPool, clock: &dyn Clock) -> AppResult<Vec<Achievement>> {
        let sessions = load_all_sessions(&pool.conn)?;
        let now = clock.now().with_timezone(&Utc);
        let already = load_unlocked(&pool.conn)?;

        let mut fresh = Vec::new();
        for def in satisfied(&sessions, clock.now().date_naive()) {
            if already.contains_key(def.id) {
                continue;
            }
            if mark_unlocked(&pool.conn, def.id, def.name, &now)? {
                ttlog_soft(&pool.conn, "achievement", def.id, def.name);
                fresh.push(Achievement::from_def(def, Some(now)));
            }
        }
        Ok(fresh)
    }
}
