//! Persisted unlock state for the achievement catalog.

use crate::errors::AppResult;
use crate::utils::date::{from_db_timestamp, to_db_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::collections::HashMap;

/// id → unlock timestamp, for every unlocked achievement.
pub fn load_unlocked(conn: &Connection) -> AppResult<HashMap<String, DateTime<Utc>>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, unlocked_date FROM achievements WHERE unlocked = 1 ORDER BY unlocked_date ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
    })?;

    let mut out = HashMap::new();
    for r in rows {
        let (id, date) = r?;
        if let Some(d) = date.as_deref().and_then(from_db_timestamp) {
            out.insert(id, d);
        }
    }
    Ok(out)
}

/// Marks an achievement unlocked. An already unlocked row keeps its original date.
pub fn mark_unlocked(conn: &Connection, id: &str, name: &str, at: &DateTime<Utc>) -> AppResult<bool> {
    let changed = conn.execute(
        "INSERT INTO achievements (id, name, unlocked, unlocked_date)
         VALUES (?1, ?2, 1, ?3)
         ON CONFLICT(id) DO UPDATE SET
            unlocked = 1,
            unlocked_date = excluded.unlocked_date
         WHERE achievements.unlocked = 0",
        params![id, name, to_db_timestamp(at)],
    )?;
    Ok(changed > 0)
}

pub fn delete_all_achievements(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM achievements", [])?)
}
