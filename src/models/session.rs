use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One block of repetitions inside a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub reps: u32,
    /// Seconds rested before this set started.
    #[serde(default)]
    pub rest_time: u32,
    pub timestamp: DateTime<Utc>,
}

/// A stored workout (⇔ one row of the `sessions` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub push_ups: u32,
    /// Seconds.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<Vec<SetRecord>>,
}

/// A workout that has not been saved yet: the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub date: DateTime<Utc>,
    pub push_ups: u32,
    pub duration: u32,
    pub goal: Option<u32>,
    pub sets: Option<Vec<SetRecord>>,
}

impl NewSession {
    pub fn new(date: DateTime<Utc>, push_ups: u32, duration: u32) -> Self {
        Self {
            date,
            push_ups,
            duration,
            goal: None,
            sets: None,
        }
    }

    pub fn with_goal(mut self, goal: u32) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn with_sets(mut self, sets: Vec<SetRecord>) -> Self {
        self.sets = if sets.is_empty() { None } else { Some(sets) };
        self
    }
}

impl WorkoutSession {
    /// Calendar day of the session in the local timezone.
    pub fn local_day(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }

    /// Identity used by import to detect duplicates: exact timestamp, reps and duration.
    pub fn dedup_key(&self) -> (i64, u32, u32) {
        (self.date.timestamp_millis(), self.push_ups, self.duration)
    }

    pub fn date_str(&self) -> String {
        self.date
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}
