//! Reminder parameters. Delivery belongs to a notification scheduler
//! implementing [`ReminderScheduler`]; this module computes when and keeps
//! the scheduler in step with the settings.
//!
//! The CLI has no notification backend and plans through [`LogScheduler`],
//! which records every planned reminder in the internal log.

use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::models::settings::AppSettings;
use crate::utils::date::local_to_utc;
use chrono::{DateTime, Datelike, Duration, Local, Utc};
use rusqlite::Connection;

/// Interface of the external notification scheduler.
pub trait ReminderScheduler {
    fn schedule(&mut self, id: &str, at: DateTime<Utc>, message: &str) -> AppResult<()>;
    fn cancel(&mut self, id: &str) -> AppResult<()>;
    fn cancel_all(&mut self) -> AppResult<()>;
}

/// Id under which the daily workout reminder is scheduled.
pub const DAILY_REMINDER_ID: &str = "daily-workout";

/// Next instant strictly after `now` matching `reminderTime` on one of the
/// allowed weekdays (0 = Monday; no weekdays = every day).
pub fn next_reminder(settings: &AppSettings, now: DateTime<Local>) -> Option<DateTime<Utc>> {
    let time = settings.reminder_naive_time()?;
    let allowed = |wd: u32| match &settings.days_of_week {
        Some(days) if !days.is_empty() => days.contains(&(wd as u8)),
        _ => true,
    };

    let today = now.date_naive();
    (0..=7)
        .map(|offset| today + Duration::days(offset))
        .filter(|d| allowed(d.weekday().num_days_from_monday()))
        .map(|d| local_to_utc(d.and_time(time)))
        .find(|at| *at > now.with_timezone(&Utc))
}

/// Re-plans the daily reminder after a settings change.
pub fn sync_reminder(
    scheduler: &mut dyn ReminderScheduler,
    settings: &AppSettings,
    now: DateTime<Local>,
) -> AppResult<Option<DateTime<Utc>>> {
    scheduler.cancel(DAILY_REMINDER_ID)?;
    match next_reminder(settings, now) {
        Some(at) => {
            let msg = format!("Time for your {} push-ups!", settings.daily_goal);
            scheduler.schedule(DAILY_REMINDER_ID, at, &msg)?;
            Ok(Some(at))
        }
        None => Ok(None),
    }
}

/// Records reminder plans in the `log` table under the `reminder` operation.
pub struct LogScheduler<'a> {
    conn: &'a Connection,
}

impl<'a> LogScheduler<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ReminderScheduler for LogScheduler<'_> {
    fn schedule(&mut self, id: &str, at: DateTime<Utc>, message: &str) -> AppResult<()> {
        let when = at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        ttlog(self.conn, "reminder", id, &format!("scheduled {}: {}", when, message))
    }

    fn cancel(&mut self, id: &str) -> AppResult<()> {
        ttlog(self.conn, "reminder", id, "cancelled")
    }

    fn cancel_all(&mut self) -> AppResult<()> {
        ttlog(self.conn, "reminder", "", "all reminders cancelled")
    }
}
