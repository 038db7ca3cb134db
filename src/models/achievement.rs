use super::session::WorkoutSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unlock condition of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Condition {
    /// Lifetime push-ups reach the threshold.
    TotalAtLeast(u64),
    /// Current streak reaches the given number of days.
    StreakAtLeast(u32),
    /// A single session reaches the given number of reps.
    SessionAtLeast(u32),
}

impl Condition {
    pub fn is_met(&self, total: u64, streak: u32, sessions: &[WorkoutSession]) -> bool {
        match *self {
            Condition::TotalAtLeast(n) => total >= n,
            Condition::StreakAtLeast(days) => streak >= days,
            Condition::SessionAtLeast(reps) => sessions.iter().any(|s| s.push_ups >= reps),
        }
    }
}

/// Static description of an achievement in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub condition: Condition,
}

/// Catalog entry merged with its persisted unlock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition: Condition,
    pub unlocked: bool,
    pub unlocked_date: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn from_def(def: &AchievementDef, unlocked_date: Option<DateTime<Utc>>) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            icon: def.icon.to_string(),
            condition: def.condition,
            unlocked: unlocked_date.is_some(),
            unlocked_date,
        }
    }
}

pub const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_session",
        name: "First Steps",
        description: "Complete your first workout",
        icon: "🎯",
        condition: Condition::SessionAtLeast(1),
    },
    AchievementDef {
        id: "session_50",
        name: "Half Century",
        description: "Do 50 push-ups in a single session",
        icon: "💪",
        condition: Condition::SessionAtLeast(50),
    },
    AchievementDef {
        id: "session_100",
        name: "Centurion",
        description: "Do 100 push-ups in a single session",
        icon: "🏛️",
        condition: Condition::SessionAtLeast(100),
    },
    AchievementDef {
        id: "total_100",
        name: "Getting Started",
        description: "Reach 100 push-ups in total",
        icon: "🥉",
        condition: Condition::TotalAtLeast(100),
    },
    AchievementDef {
        id: "total_1000",
        name: "Thousand Club",
        description: "Reach 1,000 push-ups in total",
        icon: "🥈",
        condition: Condition::TotalAtLeast(1_000),
    },
    AchievementDef {
        id: "total_10000",
        name: "Iron Arms",
        description: "Reach 10,000 push-ups in total",
        icon: "🥇",
        condition: Condition::TotalAtLeast(10_000),
    },
    AchievementDef {
        id: "streak_3",
        name: "On a Roll",
        description: "Train 3 days in a row",
        icon: "🔥",
        condition: Condition::StreakAtLeast(3),
    },
    AchievementDef {
        id: "streak_7",
        name: "Full Week",
        description: "Train 7 days in a row",
        icon: "📅",
        condition: Condition::StreakAtLeast(7),
    },
    AchievementDef {
        id: "streak_30",
        name: "Unstoppable",
        description: "Train 30 days in a row",
        icon: "🏆",
        condition: Condition::StreakAtLeast(30),
    },
];
