//! Generation lifecycle and bucket naming.

use serde::Serialize;

/// `installing → waiting → active → redundant`
///
/// Promotion is one storage transaction, so no generation is ever observed
/// half way between waiting and active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Installing,
    Waiting,
    Active,
    Redundant,
}

impl GenerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Installing => "installing",
            GenerationState::Waiting => "waiting",
            GenerationState::Active => "active",
            GenerationState::Redundant => "redundant",
        }
    }
}

pub fn static_bucket(prefix: &str, version: &str) -> String {
    format!("{}-static-{}", prefix, version)
}

pub fn runtime_bucket(prefix: &str, version: &str) -> String {
    format!("{}-runtime-{}", prefix, version)
}

/// The buckets a generation is allowed to keep when it becomes active.
pub fn whitelist(prefix: &str, version: &str) -> [String; 2] {
    [static_bucket(prefix, version), runtime_bucket(prefix, version)]
}
