use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const MIN_DAILY_GOAL: u32 = 1;
pub const MAX_DAILY_GOAL: u32 = 1000;

/// The singleton settings record (⇔ `settings` row with id = 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub daily_goal: u32,
    pub sound_enabled: bool,
    pub dark_mode: bool,
    pub auto_save: bool,
    pub language: String,
    /// "HH:MM", local time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    /// 0 = Monday … 6 = Sunday, sorted and unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            daily_goal: 50,
            sound_enabled: true,
            dark_mode: false,
            auto_save: true,
            language: "en".to_string(),
            reminder_time: None,
            days_of_week: None,
        }
    }
}

/// Partial update: every `Some` field replaces the stored one.
///
/// An empty `reminder_time` or `days_of_week` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub daily_goal: Option<u32>,
    #[serde(default)]
    pub sound_enabled: Option<bool>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub auto_save: Option<bool>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

impl AppSettings {
    /// Shallow merge of `patch` over `self`, validating every touched field.
    pub fn merged(&self, patch: &SettingsPatch) -> AppResult<AppSettings> {
        let mut out = self.clone();

        if let Some(goal) = patch.daily_goal {
            if !(MIN_DAILY_GOAL..=MAX_DAILY_GOAL).contains(&goal) {
                return Err(AppError::InvalidGoal(goal));
            }
            out.daily_goal = goal;
        }
        if let Some(v) = patch.sound_enabled {
            out.sound_enabled = v;
        }
        if let Some(v) = patch.dark_mode {
            out.dark_mode = v;
        }
        if let Some(v) = patch.auto_save {
            out.auto_save = v;
        }
        if let Some(lang) = &patch.language {
            let lang = lang.trim();
            if lang.is_empty() {
                return Err(AppError::Config("language must not be empty".into()));
            }
            out.language = lang.to_string();
        }
        if let Some(time) = &patch.reminder_time {
            out.reminder_time = if time.trim().is_empty() {
                None
            } else {
                Some(normalize_reminder_time(time)?)
            };
        }
        if let Some(days) = &patch.days_of_week {
            out.days_of_week = if days.is_empty() {
                None
            } else {
                Some(normalize_days(days)?)
            };
        }

        Ok(out)
    }

    pub fn reminder_naive_time(&self) -> Option<NaiveTime> {
        self.reminder_time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
    }
}

/// Accepts "H:MM" or "HH:MM" and returns the canonical "HH:MM".
pub fn normalize_reminder_time(s: &str) -> AppResult<String> {
    let t = NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| AppError::InvalidTime(s.to_string()))?;
    Ok(t.format("%H:%M").to_string())
}

pub fn normalize_days(days: &[u8]) -> AppResult<Vec<u8>> {
    if let Some(bad) = days.iter().find(|d| **d > 6) {
        return Err(AppError::InvalidWeekday(*bad));
    }
    let mut out = days.to_vec();
    out.sort_unstable();
    out.dedup();
    Ok(out)
}
