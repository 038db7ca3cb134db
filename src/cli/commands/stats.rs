use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{Period, StatsLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, success};
use crate::utils::clock::SystemClock;
use crate::utils::colors::{color_for_progress, colorize};
use crate::utils::formatting::{bold, progress_bar};
use crate::utils::secs2readable;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { period } = cmd {
        let period: Period = period.as_deref().unwrap_or(&cfg.default_period).parse()?;
        let clock = SystemClock;
        let mut pool = DbPool::open(&cfg.database)?;

        let s = StatsLogic::summary(&mut pool, &clock)?;
        header("Statistics");

        let goal = s.daily_goal as u64;
        println!(
            "{:<16}{} / {}  {}",
            "Today:",
            bold(&s.today_push_ups.to_string()),
            goal,
            colorize(
                &progress_bar(s.today_push_ups, goal, 20),
                color_for_progress(s.today_push_ups, goal)
            )
        );
        println!("{:<16}{}", "Total:", s.total_push_ups);
        println!("{:<16}{} days", "Current streak:", s.current_streak);
        match s.best_day {
            Some((day, n)) => println!("{:<16}{} ({})", "Best day:", n, day),
            None => println!("{:<16}-", "Best day:"),
        }
        println!("{:<16}{}", "Avg/session:", s.average_per_session);
        println!("{:<16}{}", "Sessions:", s.session_count);
        println!("{:<16}{}", "Time trained:", secs2readable(s.total_duration));

        if s.goal_reached {
            success("🎯 Daily goal reached!");
        }

        let p = StatsLogic::period(&mut pool, period, &clock)?;
        println!();
        header(format!("Last {}", p.period.as_str()));

        let sep = cfg.separator_char.chars().next().unwrap_or('-');
        let mut table = Table::new(vec![
            Column::left("Period"),
            Column::right("Push-ups"),
            Column::right("Sessions"),
            Column::right("Time"),
        ])
        .with_separator(sep);
        for b in &p.buckets {
            table.add_row(vec![
                b.label.clone(),
                b.push_ups.to_string(),
                b.sessions.to_string(),
                secs2readable(b.duration),
            ]);
        }
        println!("{}", table.render());
        println!(
            "{} push-ups in {} sessions ({})",
            p.push_ups,
            p.sessions,
            secs2readable(p.duration)
        );
    }
    Ok(())
}
