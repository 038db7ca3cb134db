use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::session::{NewSession, WorkoutSession};
use crate::utils::clock::Clock;
use crate::utils::date::local_day_bounds;
use chrono::{DateTime, Utc};

/// Read/write access to workout sessions.
pub struct SessionLogic;

impl SessionLogic {
    /// Persist a finished workout and return its new id.
    ///
    /// Empty workouts (zero push-ups) are never stored.
    pub fn save_session(pool: &mut DbPool, session: &NewSession) -> AppResult<i64> {
        if session.push_ups == 0 {
            return Err(AppError::InvalidSession(
                "a session needs at least one push-up".into(),
            ));
        }
        if let Some(sets) = &session.sets {
            let reps: u64 = sets.iter().map(|s| s.reps as u64).sum();
            if reps > session.push_ups as u64 {
                return Err(AppError::InvalidSession(format!(
                    "sets add up to {} reps but the session has {}",
                    reps, session.push_ups
                )));
            }
        }

        let id = queries::insert_session(&pool.conn, session)?;
        ttlog_soft(
            &pool.conn,
            "add",
            &format!("session {}", id),
            &format!(
                "{} push-ups in {}s",
                session.push_ups, session.duration
            ),
        );
        Ok(id)
    }

    pub fn get_session(pool: &mut DbPool, id: i64) -> AppResult<WorkoutSession> {
        queries::load_session(&pool.conn, id)?.ok_or(AppError::SessionNotFound(id))
    }

    /// Every session, newest first. An empty store yields an empty list.
    pub fn get_all_sessions(pool: &mut DbPool) -> AppResult<Vec<WorkoutSession>> {
        queries::load_all_sessions(&pool.conn)
    }

    /// Sessions with `start <= date <= end` (both ends inclusive), newest first.
    pub fn get_sessions_in_range(
        pool: &mut DbPool,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutSession>> {
        if start > end {
            return Ok(Vec::new());
        }
        queries::load_sessions_in_range(&pool.conn, start, end)
    }

    /// Sessions between local midnight and the next midnight of "now".
    pub fn get_today_sessions(
        pool: &mut DbPool,
        clock: &dyn Clock,
    ) -> AppResult<Vec<WorkoutSession>> {
        let (start, end) = local_day_bounds(clock.now().date_naive());
        queries::load_sessions_in_range(&pool.conn, &start, &end)
    }

    pub fn count_sessions(pool: &mut DbPool) -> AppResult<i64> {
        queries::count_sessions(&pool.conn)
    }
}
