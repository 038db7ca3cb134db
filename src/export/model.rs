// src/export/model.rs

use crate::models::session::WorkoutSession;
use crate::models::settings::AppSettings;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Format version written into every export.
pub const EXPORT_VERSION: &str = "1.0";

/// Top-level shape of an export file; import accepts exactly this shape.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub total_push_ups: u64,
    pub sessions: Vec<WorkoutSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AppSettings>,
}

/// Flat session row for CSV.
#[derive(Serialize, Clone, Debug)]
pub struct SessionCsvRow {
    pub id: i64,
    pub date: String,
    pub local_date: String,
    pub push_ups: u32,
    pub duration: u32,
    pub goal: String,
    pub sets: usize,
}

impl From<&WorkoutSession> for SessionCsvRow {
    fn from(s: &WorkoutSession) -> Self {
        Self {
            id: s.id,
            date: s.date.to_rfc3339(),
            local_date: s.date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            push_ups: s.push_ups,
            duration: s.duration,
            goal: s.goal.map(|g| g.to_string()).unwrap_or_default(),
            sets: s.sets.as_ref().map(Vec::len).unwrap_or(0),
        }
    }
}
