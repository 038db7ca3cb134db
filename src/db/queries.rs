//! Row-level access to the `sessions` table.

use crate::errors::{AppError, AppResult};
use crate::models::session::{NewSession, SetRecord, WorkoutSession};
use crate::utils::date::{from_db_timestamp, to_db_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_SESSION: &str = "SELECT id, date, push_ups, duration, goal, sets FROM sessions";

pub fn map_row(row: &Row) -> Result<WorkoutSession> {
    let date_str: String = row.get("date")?;
    let date = from_db_timestamp(&date_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let sets_json: Option<String> = row.get("sets")?;
    let sets = match sets_json {
        Some(s) if !s.is_empty() => Some(serde_json::from_str::<Vec<SetRecord>>(&s).map_err(
            |e| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            },
        )?),
        _ => None,
    };

    Ok(WorkoutSession {
        id: row.get("id")?,
        date,
        push_ups: row.get("push_ups")?,
        duration: row.get("duration")?,
        goal: row.get("goal")?,
        sets,
    })
}

fn collect(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<WorkoutSession>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(args, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a session and return its freshly assigned id.
pub fn insert_session(conn: &Connection, s: &NewSession) -> AppResult<i64> {
    let sets = match &s.sets {
        Some(v) if !v.is_empty() => Some(serde_json::to_string(v)?),
        _ => None,
    };

    conn.execute(
        "INSERT INTO sessions (date, push_ups, duration, goal, sets, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            to_db_timestamp(&s.date),
            s.push_ups,
            s.duration,
            s.goal,
            sets,
            to_db_timestamp(&Utc::now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_session(conn: &Connection, id: i64) -> AppResult<Option<WorkoutSession>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_SESSION} WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// All sessions, newest first.
pub fn load_all_sessions(conn: &Connection) -> AppResult<Vec<WorkoutSession>> {
    collect(
        conn,
        &format!("{SELECT_SESSION} ORDER BY date DESC, id DESC"),
        &[],
    )
}

/// Sessions with `start <= date <= end`, newest first.
pub fn load_sessions_in_range(
    conn: &Connection,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> AppResult<Vec<WorkoutSession>> {
    collect(
        conn,
        &format!("{SELECT_SESSION} WHERE date >= ?1 AND date <= ?2 ORDER BY date DESC, id DESC"),
        &[&to_db_timestamp(start), &to_db_timestamp(end)],
    )
}

pub fn count_sessions(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?)
}

pub fn delete_session(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?)
}

pub fn delete_sessions_in_range(
    conn: &Connection,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM sessions WHERE date >= ?1 AND date <= ?2",
        params![to_db_timestamp(start), to_db_timestamp(end)],
    )?)
}

pub fn delete_sessions_before(conn: &Connection, cutoff: &DateTime<Utc>) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM sessions WHERE date < ?1",
        [to_db_timestamp(cutoff)],
    )?)
}

pub fn delete_all_sessions(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM sessions", [])?)
}
