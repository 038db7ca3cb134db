use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::SessionLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::session::WorkoutSession;
use crate::ui::messages::info;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::date::{first_of_month, last_of_month, local_day_bounds, parse_date};
use crate::utils::secs2readable;
use crate::utils::table::{Column, Table};
use chrono::{DateTime, NaiveDate, Utc};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { range } = cmd {
        let mut pool = DbPool::open(&cfg.database)?;
        let clock = SystemClock;

        let sessions = match range.as_deref() {
            None | Some("all") => SessionLogic::get_all_sessions(&mut pool)?,
            Some("today") => SessionLogic::get_today_sessions(&mut pool, &clock)?,
            Some(r) => {
                let (start, end) = resolve_range(r, clock.now().date_naive())?;
                SessionLogic::get_sessions_in_range(&mut pool, &start, &end)?
            }
        };

        if sessions.is_empty() {
            info("No sessions found.");
            return Ok(());
        }

        print_sessions(&sessions, cfg);
    }
    Ok(())
}

/// today | YYYY-MM-DD | YYYY-MM | FROM:TO, with local day boundaries.
fn resolve_range(r: &str, today: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let day = |s: &str| -> AppResult<NaiveDate> {
        if s == "today" {
            return Ok(today);
        }
        parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
    };

    if let Some((from, to)) = r.split_once(':') {
        let (a, b) = (day(from)?, day(to)?);
        return Ok((local_day_bounds(a).0, local_day_bounds(b).1));
    }

    if let Ok(d) = day(r) {
        return Ok(local_day_bounds(d));
    }

    // YYYY-MM
    let month = parse_date(&format!("{}-01", r)).ok_or_else(|| AppError::InvalidDate(r.to_string()))?;
    let first = first_of_month(month);
    Ok((local_day_bounds(first).0, local_day_bounds(last_of_month(first)).1))
}

fn print_sessions(sessions: &[WorkoutSession], cfg: &Config) {
    let sep = cfg.separator_char.chars().next().unwrap_or('-');
    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::left("Date"),
        Column::right("Push-ups"),
        Column::right("Duration"),
        Column::right("Sets"),
        Column::right("Goal"),
    ])
    .with_separator(sep);

    for s in sessions {
        table.add_row(vec![
            s.id.to_string(),
            s.date_str(),
            s.push_ups.to_string(),
            secs2readable(s.duration as u64),
            s.sets.as_ref().map(|v| v.len().to_string()).unwrap_or_else(|| "-".into()),
            s.goal.map(|g| g.to_string()).unwrap_or_else(|| "-".into()),
        ]);
    }

    println!("{}", table.render());
    let total: u64 = sessions.iter().map(|s| s.push_ups as u64).sum();
    println!("{} sessions, {} push-ups", sessions.len(), total);
}
