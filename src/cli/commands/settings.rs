use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::SettingsLogic;
use crate::core::reminder::{LogScheduler, next_reminder, sync_reminder};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::settings::{AppSettings, SettingsPatch};
use crate::ui::messages::{header, info, success};
use chrono::Local;

/// "0,2,4" → [0, 2, 4]; an empty string means every day.
fn parse_days(s: &str) -> AppResult<Vec<u8>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<u8>()
                .map_err(|_| AppError::Config(format!("invalid weekday '{}'", p)))
        })
        .collect()
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

fn print_settings(s: &AppSettings) {
    header("Settings");
    println!("{:<14}{}", "Daily goal:", s.daily_goal);
    println!("{:<14}{}", "Sound:", on_off(s.sound_enabled));
    println!("{:<14}{}", "Dark mode:", on_off(s.dark_mode));
    println!("{:<14}{}", "Auto-save:", on_off(s.auto_save));
    println!("{:<14}{}", "Language:", s.language);
    println!(
        "{:<14}{}",
        "Reminder:",
        s.reminder_time.as_deref().unwrap_or("off")
    );
    let days = match &s.days_of_week {
        Some(d) => d
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(","),
        None => "every day".to_string(),
    };
    println!("{:<14}{}", "Days:", days);
    if let Some(at) = next_reminder(s, Local::now()) {
        println!(
            "{:<14}{}",
            "Next:",
            at.with_timezone(&Local).format("%a %Y-%m-%d %H:%M")
        );
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings {
        show,
        goal,
        sound,
        dark,
        auto_save,
        language,
        reminder,
        days,
    } = cmd
    {
        let patch = SettingsPatch {
            daily_goal: *goal,
            sound_enabled: *sound,
            dark_mode: *dark,
            auto_save: *auto_save,
            language: language.clone(),
            reminder_time: reminder.clone(),
            days_of_week: days.as_deref().map(parse_days).transpose()?,
        };

        let mut pool = DbPool::open(&cfg.database)?;

        if !patch.is_empty() {
            let updated = SettingsLogic::update_settings(&mut pool, &patch)?;
            success("Settings updated.");

            // The reminder message quotes the goal, so a goal change re-plans too.
            if patch.reminder_time.is_some()
                || patch.days_of_week.is_some()
                || patch.daily_goal.is_some()
            {
                let mut scheduler = LogScheduler::new(&pool.conn);
                match sync_reminder(&mut scheduler, &updated, Local::now())? {
                    Some(at) => info(format!(
                        "Next reminder: {}",
                        at.with_timezone(&Local).format("%a %Y-%m-%d %H:%M")
                    )),
                    None => info("Reminders are off."),
                }
            }
            if *show {
                print_settings(&updated);
            }
            return Ok(());
        }

        print_settings(&SettingsLogic::get_settings(&mut pool)?);
    }
    Ok(())
}
