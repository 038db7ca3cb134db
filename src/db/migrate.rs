//! Versioned schema upgrades driven by `PRAGMA user_version`.

use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::Connection;

/// Schema version this binary writes.
pub const SCHEMA_VERSION: u32 = 1;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "20250301_0001_initial_schema",
    sql: r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT    NOT NULL,
            push_ups    INTEGER NOT NULL CHECK(push_ups >= 0),
            duration    INTEGER NOT NULL DEFAULT 0 CHECK(duration >= 0),
            goal        INTEGER,
            sets        TEXT,
            created_at  TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_date     ON sessions(date);
        CREATE INDEX IF NOT EXISTS idx_sessions_push_ups ON sessions(push_ups);
        CREATE INDEX IF NOT EXISTS idx_sessions_duration ON sessions(duration);
        CREATE INDEX IF NOT EXISTS idx_sessions_goal     ON sessions(goal);

        CREATE TABLE IF NOT EXISTS settings (
            id             INTEGER PRIMARY KEY CHECK(id = 1),
            daily_goal     INTEGER NOT NULL CHECK(daily_goal BETWEEN 1 AND 1000),
            sound_enabled  INTEGER NOT NULL DEFAULT 1,
            dark_mode      INTEGER NOT NULL DEFAULT 0,
            auto_save      INTEGER NOT NULL DEFAULT 1,
            language       TEXT    NOT NULL DEFAULT 'en',
            reminder_time  TEXT,
            days_of_week   TEXT,
            updated_at     TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_settings_goal     ON settings(daily_goal);
        CREATE INDEX IF NOT EXISTS idx_settings_sound    ON settings(sound_enabled);
        CREATE INDEX IF NOT EXISTS idx_settings_theme    ON settings(dark_mode);
        CREATE INDEX IF NOT EXISTS idx_settings_language ON settings(language);

        CREATE TABLE IF NOT EXISTS achievements (
            id             TEXT    PRIMARY KEY,
            name           TEXT    NOT NULL,
            unlocked       INTEGER NOT NULL DEFAULT 0,
            unlocked_date  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_achievements_name     ON achievements(name);
        CREATE INDEX IF NOT EXISTS idx_achievements_unlocked ON achievements(unlocked);
        CREATE INDEX IF NOT EXISTS idx_achievements_date     ON achievements(unlocked_date);
    "#,
}];

/// Ensure that the `log` table exists. It lives outside the versioned schema
/// because migrations record themselves in it.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

pub fn current_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Each step runs in its own transaction together
/// with the `user_version` bump, so a failed step leaves the previous version.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    let version = current_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(AppError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            version, SCHEMA_VERSION
        )));
    }

    for m in MIGRATIONS.iter().filter(|m| m.version > version) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {}", m.name, e)))?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", m.version))?;
        ttlog(
            &tx,
            "migration_applied",
            m.name,
            &format!("Schema upgraded to v{}", m.version),
        )?;
        tx.commit()?;

        if version > 0 {
            success(format!("Migration applied: {} → v{}", m.name, m.version));
        }
    }

    Ok(())
}
