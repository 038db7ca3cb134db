//! Keeps an existing config file in step with the current set of keys.

use super::Config;
use crate::core::stats::Period;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

const KNOWN_KEYS: &[&str] = &[
    "database",
    "cache_database",
    "origin",
    "cache_prefix",
    "default_period",
    "separator_char",
];

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{:?} is not a key/value document",
            path
        ))),
    }
}

/// Keys the file does not define.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let map = read_mapping(path)?;
    Ok(KNOWN_KEYS
        .iter()
        .filter(|k| !map.contains_key(Value::String(k.to_string())))
        .map(|k| k.to_string())
        .collect())
}

/// Problems with the values themselves; empty when the file is usable.
pub fn check_values(cfg: &Config) -> Vec<String> {
    let mut problems = Vec::new();
    if cfg.database.trim().is_empty() {
        problems.push("database is empty".to_string());
    }
    if cfg.default_period.parse::<Period>().is_err() {
        problems.push(format!(
            "default_period '{}' is not one of week, month, year, all",
            cfg.default_period
        ));
    }
    if cfg.cache_prefix.is_empty()
        || !cfg
            .cache_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        problems.push(format!("cache_prefix '{}' is not a valid name", cfg.cache_prefix));
    }
    if cfg.separator_char.chars().count() != 1 {
        problems.push(format!(
            "separator_char '{}' must be a single character",
            cfg.separator_char
        ));
    }
    problems
}

/// Adds every missing key with its default value, leaving existing values
/// untouched. Returns the keys that were added.
pub fn migrate_config(path: &Path) -> AppResult<Vec<String>> {
    let mut map = read_mapping(path)?;
    let defaults = match serde_yaml::to_value(Config::default())? {
        Value::Mapping(m) => m,
        _ => return Err(AppError::Config("default config is not a mapping".into())),
    };

    let mut added = Vec::new();
    for key in KNOWN_KEYS {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k)
            && let Some(v) = defaults.get(&k)
        {
            map.insert(k, v.clone());
            added.push(key.to_string());
        }
    }

    if !added.is_empty() {
        fs::write(path, serde_yaml::to_string(&Value::Mapping(map))?)?;
    }
    Ok(added)
}
