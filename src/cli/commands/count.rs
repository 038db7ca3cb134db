use crate::cli::commands::achievements::announce_unlocks;
use crate::cli::commands::ask_confirmation;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::counter::{Counter, CounterState};
use crate::core::stats::push_ups_on;
use crate::core::{SessionLogic, SettingsLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{bell, header, info, success, warning};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::colors::{color_for_progress, colorize};
use crate::utils::formatting::progress_bar;
use crate::utils::secs2readable;
use chrono::Utc;
use std::io::{self, BufRead, Write};

const HELP: &str = "Enter = +1 · <n> = +n · s = end set · p = pause/resume · q = finish";

/// Interactive rep counter. Reads commands from stdin, one per line;
/// end of input finishes the session.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Count { goal } = cmd {
        let clock = SystemClock;
        let mut pool = DbPool::open(&cfg.database)?;
        let settings = SettingsLogic::get_settings(&mut pool)?;
        let goal = goal.unwrap_or(settings.daily_goal);

        let today = clock.now().date_naive();
        let done_today = push_ups_on(&SessionLogic::get_all_sessions(&mut pool)?, today);
        let mut goal_announced = done_today >= goal as u64;

        header("Workout");
        info(HELP);

        let mut counter = Counter::new(Some(goal));
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let line = match lines.next() {
                Some(Ok(l)) => l,
                _ => break,
            };
            let now = Utc::now();

            match line.trim() {
                "" => counter.add_reps(1, now),
                "q" => break,
                "s" => counter.complete_set(now),
                "p" => match counter.state() {
                    CounterState::Running => counter.pause(now),
                    CounterState::Paused => counter.resume(now),
                    _ => warning("Nothing to pause yet."),
                },
                other => match other.parse::<u32>() {
                    Ok(n) => counter.add_reps(n, now),
                    Err(_) => warning(format!("Unknown input '{}'. {}", other, HELP)),
                },
            }

            let today_total = done_today + counter.reps() as u64;
            println!(
                "{}  sets: {}  time: {}{}",
                colorize(
                    &progress_bar(today_total, goal as u64, 20),
                    color_for_progress(today_total, goal as u64)
                ),
                counter.sets().len(),
                secs2readable(counter.elapsed_secs(now) as u64),
                if counter.state() == CounterState::Paused {
                    "  (paused)"
                } else {
                    ""
                }
            );

            if !goal_announced && today_total >= goal as u64 {
                goal_announced = true;
                if settings.sound_enabled {
                    bell();
                }
                success(format!("🎯 Daily goal of {} reached!", goal));
            }
        }

        let Some(session) = counter.finish(Utc::now()) else {
            info("No push-ups counted, nothing saved.");
            return Ok(());
        };

        if !settings.auto_save
            && !ask_confirmation(&format!("Save session with {} push-ups?", session.push_ups))
        {
            info("Session discarded.");
            return Ok(());
        }

        let id = SessionLogic::save_session(&mut pool, &session)?;
        success(format!(
            "Session #{} saved: {} push-ups in {} ({} sets)",
            id,
            session.push_ups,
            secs2readable(session.duration as u64),
            session.sets.as_ref().map(Vec::len).unwrap_or(0)
        ));

        announce_unlocks(&mut pool, &clock)?;
    }

    Ok(())
}
