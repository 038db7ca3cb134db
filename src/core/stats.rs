//! Statistics derived from the full session list.
//!
//! Nothing here is cached: every read recomputes from the sessions, which
//! stays cheap for a personal history.

use crate::db::pool::DbPool;
use crate::db::queries::load_all_sessions;
use crate::db::settings::load_settings;
use crate::errors::{AppError, AppResult};
use crate::models::session::WorkoutSession;
use crate::utils::clock::Clock;
use crate::utils::date::{first_of_month, last_of_month, shift_month};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

pub fn total_push_ups(sessions: &[WorkoutSession]) -> u64 {
    sessions.iter().map(|s| s.push_ups as u64).sum()
}

pub fn push_ups_on(sessions: &[WorkoutSession], day: NaiveDate) -> u64 {
    sessions
        .iter()
        .filter(|s| s.local_day() == day)
        .map(|s| s.push_ups as u64)
        .sum()
}

/// Consecutive days with at least one session, walking back from `today`.
/// A day without sessions (including `today`) ends the streak.
pub fn current_streak(sessions: &[WorkoutSession], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = sessions.iter().map(|s| s.local_day()).collect();

    let mut streak = 0;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(d) => day = d,
            None => break,
        }
    }
    streak
}

/// Push-ups summed per local calendar day.
pub fn daily_totals(sessions: &[WorkoutSession]) -> BTreeMap<NaiveDate, u64> {
    let mut out = BTreeMap::new();
    for s in sessions {
        *out.entry(s.local_day()).or_insert(0) += s.push_ups as u64;
    }
    out
}

/// The day with the highest summed count. Ties go to the earliest day.
pub fn best_day(sessions: &[WorkoutSession]) -> Option<(NaiveDate, u64)> {
    daily_totals(sessions)
        .into_iter()
        .fold(None, |best, (day, total)| match best {
            Some((_, t)) if t >= total => best,
            _ => Some((day, total)),
        })
}

/// Rounded mean push-ups per session; 0 without sessions.
pub fn average_per_session(sessions: &[WorkoutSession]) -> u64 {
    if sessions.is_empty() {
        return 0;
    }
    (total_push_ups(sessions) as f64 / sessions.len() as f64).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
    All,
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "w" => Ok(Period::Week),
            "month" | "m" => Ok(Period::Month),
            "year" | "y" => Ok(Period::Year),
            "all" | "a" => Ok(Period::All),
            other => Err(AppError::Config(format!(
                "unknown period '{}': use week, month, year or all",
                other
            ))),
        }
    }
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        }
    }
}

/// One fixed-width time window of a period chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    pub push_ups: u64,
    pub sessions: u32,
    pub duration: u64,
}

impl Bucket {
    fn new(label: String, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label,
            start,
            end,
            push_ups: 0,
            sessions: 0,
            duration: 0,
        }
    }

    fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub period: Period,
    pub buckets: Vec<Bucket>,
    pub push_ups: u64,
    pub sessions: u32,
    pub duration: u64,
}

/// Empty buckets for `period`, oldest first, the last one containing `today`.
///
/// - week: 7 daily buckets
/// - month: 4 buckets of 7 days
/// - year: 12 calendar months
/// - all: calendar years from `first_day`'s year (or today's) to today's
pub fn period_buckets(period: Period, today: NaiveDate, first_day: Option<NaiveDate>) -> Vec<Bucket> {
    match period {
        Period::Week => (0..7)
            .rev()
            .map(|back| {
                let d = today - Duration::days(back);
                Bucket::new(d.format("%a %d").to_string(), d, d)
            })
            .collect(),
        Period::Month => (0..4)
            .rev()
            .map(|back| {
                let end = today - Duration::days(back * 7);
                let start = end - Duration::days(6);
                Bucket::new(start.format("%d %b").to_string(), start, end)
            })
            .collect(),
        Period::Year => (0..12)
            .rev()
            .map(|back| {
                let start = shift_month(first_of_month(today), -back);
                Bucket::new(start.format("%b %Y").to_string(), start, last_of_month(start))
            })
            .collect(),
        Period::All => {
            let from = first_day.map(|d| d.year()).unwrap_or(today.year()).min(today.year());
            (from..=today.year())
                .filter_map(|y| {
                    let start = NaiveDate::from_ymd_opt(y, 1, 1)?;
                    let end = NaiveDate::from_ymd_opt(y, 12, 31)?;
                    Some(Bucket::new(y.to_string(), start, end))
                })
                .collect()
        }
    }
}

pub fn period_stats(sessions: &[WorkoutSession], period: Period, today: NaiveDate) -> PeriodStats {
    let first_day = sessions.iter().map(|s| s.local_day()).min();
    let mut buckets = period_buckets(period, today, first_day);

    for s in sessions {
        let day = s.local_day();
        if let Some(b) = buckets.iter_mut().find(|b| b.contains(day)) {
            b.push_ups += s.push_ups as u64;
            b.sessions += 1;
            b.duration += s.duration as u64;
        }
    }

    PeriodStats {
        period,
        push_ups: buckets.iter().map(|b| b.push_ups).sum(),
        sessions: buckets.iter().map(|b| b.sessions).sum(),
        duration: buckets.iter().map(|b| b.duration).sum(),
        buckets,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total_push_ups: u64,
    pub today_push_ups: u64,
    pub current_streak: u32,
    pub best_day: Option<(NaiveDate, u64)>,
    pub average_per_session: u64,
    pub session_count: usize,
    pub total_duration: u64,
    pub daily_goal: u32,
    pub goal_reached: bool,
    /// 0..=100
    pub today_progress: u8,
}

impl StatsSummary {
    pub fn compute(sessions: &[WorkoutSession], daily_goal: u32, today: NaiveDate) -> Self {
        let today_push_ups = push_ups_on(sessions, today);
        let goal = daily_goal.max(1) as u64;
        let progress = ((today_push_ups as f64 / goal as f64) * 100.0).min(100.0).round() as u8;

        Self {
            total_push_ups: total_push_ups(sessions),
            today_push_ups,
            current_streak: current_streak(sessions, today),
            best_day: best_day(sessions),
            average_per_session: average_per_session(sessions),
            session_count: sessions.len(),
            total_duration: sessions.iter().map(|s| s.duration as u64).sum(),
            daily_goal,
            goal_reached: today_push_ups >= goal,
            today_progress: progress,
        }
    }
}

/// Store-backed entry points.
pub struct StatsLogic;

impl StatsLogic {
    pub fn summary(pool: &mut DbPool, clock: &dyn Clock) -> AppResult<StatsSummary> {
        let sessions = load_all_sessions(&pool.conn)?;
        let goal = load_settings(&pool.conn)?.unwrap_or_default().daily_goal;
        Ok(StatsSummary::compute(&sessions, goal, clock.now().date_naive()))
    }

    pub fn total_push_ups(pool: &mut DbPool) -> AppResult<u64> {
        Ok(total_push_ups(&load_all_sessions(&pool.conn)?))
    }

    pub fn period(pool: &mut DbPool, period: Period, clock: &dyn Clock) -> AppResult<PeriodStats> {
        let sessions = load_all_sessions(&pool.conn)?;
        Ok(period_stats(&sessions, period, clock.now().date_naive()))
    }
}
