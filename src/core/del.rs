use crate::db::achievements::delete_all_achievements;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::db::settings::{delete_settings, upsert_settings};
use crate::errors::AppResult;
use crate::models::settings::AppSettings;
use crate::utils::clock::Clock;
use crate::utils::date::{local_day_bounds, local_to_utc};
use chrono::{Duration, NaiveDate, NaiveTime};

/// Independent delete operations. None of them cascades into settings.
pub struct DeleteLogic;

impl DeleteLogic {
    /// Returns true when a row was removed.
    pub fn delete_session(pool: &mut DbPool, id: i64) -> AppResult<bool> {
        let n = queries::delete_session(&pool.conn, id)?;
        if n > 0 {
            ttlog_soft(&pool.conn, "del", &format!("session {}", id), "Session deleted");
        }
        Ok(n > 0)
    }

    /// Deletes all listed ids atomically; returns how many existed.
    pub fn delete_sessions(pool: &mut DbPool, ids: &[i64]) -> AppResult<usize> {
        let tx = pool.conn.transaction()?;
        let mut removed = 0;
        for id in ids {
            removed += queries::delete_session(&tx, *id)?;
        }
        tx.commit()?;

        if removed > 0 {
            ttlog_soft(
                &pool.conn,
                "del",
                &format!("{} sessions", removed),
                "Bulk delete",
            );
        }
        Ok(removed)
    }

    /// Removes every session on the given local calendar day.
    pub fn delete_sessions_on_date(pool: &mut DbPool, date: NaiveDate) -> AppResult<usize> {
        let (start, end) = local_day_bounds(date);
        let n = queries::delete_sessions_in_range(&pool.conn, &start, &end)?;
        ttlog_soft(
            &pool.conn,
            "del",
            &date.format("%Y-%m-%d").to_string(),
            &format!("Deleted {} sessions", n),
        );
        Ok(n)
    }

    /// Removes sessions that started before local midnight `days` days ago.
    pub fn delete_sessions_older_than(
        pool: &mut DbPool,
        days: u32,
        clock: &dyn Clock,
    ) -> AppResult<usize> {
        let cutoff_day = clock.now().date_naive() - Duration::days(days as i64);
        let cutoff = local_to_utc(cutoff_day.and_time(NaiveTime::MIN));
        let n = queries::delete_sessions_before(&pool.conn, &cutoff)?;
        ttlog_soft(
            &pool.conn,
            "del",
            &format!("older than {} days", days),
            &format!("Deleted {} sessions", n),
        );
        Ok(n)
    }

    /// Wipes sessions and achievements. Settings survive.
    pub fn clear_all_sessions(pool: &mut DbPool) -> AppResult<usize> {
        let tx = pool.conn.transaction()?;
        let n = queries::delete_all_sessions(&tx)?;
        delete_all_achievements(&tx)?;
        tx.commit()?;

        ttlog_soft(
            &pool.conn,
            "clear",
            "sessions",
            &format!("Cleared {} sessions and all achievements", n),
        );
        Ok(n)
    }

    /// Wipes all three collections, then seeds default settings again.
    pub fn reset_everything(pool: &mut DbPool) -> AppResult<()> {
        let tx = pool.conn.transaction()?;
        queries::delete_all_sessions(&tx)?;
        delete_all_achievements(&tx)?;
        delete_settings(&tx)?;
        upsert_settings(&tx, &AppSettings::default())?;
        tx.commit()?;

        ttlog_soft(&pool.conn, "reset", "all", "All data removed, defaults restored");
        Ok(())
    }
}
