use crate::db::migrate::current_version;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::from_db_timestamp;
use chrono::Local;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE + SCHEMA
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);
    println!(
        "{}• Schema version:{} v{}",
        CYAN,
        RESET,
        current_version(&pool.conn)?
    );

    //
    // 2) TOTALS
    //
    let (count, total): (i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*), IFNULL(SUM(push_ups), 0) FROM sessions",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!("{}• Sessions:{} {}{}{}", CYAN, RESET, GREEN, count, RESET);
    println!("{}• Push-ups:{} {}{}{}", CYAN, RESET, GREEN, total, RESET);

    //
    // 3) DATE RANGE
    //
    let bounds: Option<(Option<String>, Option<String>)> = pool
        .conn
        .query_row("SELECT MIN(date), MAX(date) FROM sessions", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;

    let fmt = |v: Option<String>| {
        v.as_deref()
            .and_then(from_db_timestamp)
            .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    let (first, last) = bounds.unwrap_or((None, None));
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    println!();
    Ok(())
}
