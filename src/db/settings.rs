//! The singleton `settings` row (fixed key id = 1).

use crate::errors::AppResult;
use crate::models::settings::{AppSettings, SettingsPatch};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SETTINGS_ID: i64 = 1;

fn map_settings(row: &Row) -> rusqlite::Result<AppSettings> {
    let days: Option<String> = row.get("days_of_week")?;
    let days_of_week = days.filter(|s| !s.is_empty()).map(|s| {
        s.split(',')
            .filter_map(|d| d.trim().parse::<u8>().ok())
            .collect::<Vec<u8>>()
    });

    Ok(AppSettings {
        daily_goal: row.get("daily_goal")?,
        sound_enabled: row.get("sound_enabled")?,
        dark_mode: row.get("dark_mode")?,
        auto_save: row.get("auto_save")?,
        language: row.get("language")?,
        reminder_time: row.get("reminder_time")?,
        days_of_week,
    })
}

/// Stored settings, or `None` when the row has never been written.
pub fn load_settings(conn: &Connection) -> AppResult<Option<AppSettings>> {
    let mut stmt = conn.prepare_cached(
        "SELECT daily_goal, sound_enabled, dark_mode, auto_save, language, reminder_time, days_of_week
         FROM settings WHERE id = ?1",
    )?;
    Ok(stmt.query_row([SETTINGS_ID], map_settings).optional()?)
}

/// Insert-or-replace the singleton row in a single statement.
pub fn upsert_settings(conn: &Connection, s: &AppSettings) -> AppResult<()> {
    let days = s.days_of_week.as_ref().map(|d| {
        d.iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(",")
    });

    conn.execute(
        "INSERT INTO settings
            (id, daily_goal, sound_enabled, dark_mode, auto_save, language, reminder_time, days_of_week, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
            daily_goal    = excluded.daily_goal,
            sound_enabled = excluded.sound_enabled,
            dark_mode     = excluded.dark_mode,
            auto_save     = excluded.auto_save,
            language      = excluded.language,
            reminder_time = excluded.reminder_time,
            days_of_week  = excluded.days_of_week,
            updated_at    = excluded.updated_at",
        params![
            SETTINGS_ID,
            s.daily_goal,
            s.sound_enabled,
            s.dark_mode,
            s.auto_save,
            s.language,
            s.reminder_time,
            days,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Read-merge-write inside one transaction.
pub fn merge_settings(conn: &Connection, patch: &SettingsPatch) -> AppResult<AppSettings> {
    let tx = conn.unchecked_transaction()?;
    let current = load_settings(&tx)?.unwrap_or_default();
    let merged = current.merged(patch)?;
    upsert_settings(&tx, &merged)?;
    tx.commit()?;
    Ok(merged)
}

/// Returns true when the defaults had to be written.
pub fn seed_defaults_if_missing(conn: &Connection) -> AppResult<bool> {
    if load_settings(conn)?.is_some() {
        return Ok(false);
    }
    upsert_settings(conn, &AppSettings::default())?;
    Ok(true)
}

pub fn delete_settings(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM settings", [])?)
}
