use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_session, load_all_sessions};
use crate::db::settings::{load_settings, upsert_settings};
use crate::models::import_result::ImportResult;
use crate::models::session::{NewSession, SetRecord};
use crate::models::settings::SettingsPatch;
use crate::utils::date::parse_flexible;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Number of leading entries checked for shape before anything is written.
pub const PROBE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Also apply the document's `settings` block, when present.
    pub with_settings: bool,
}

pub struct ImportLogic;

impl ImportLogic {
    /// Imports a `.json` file. Any other name is refused before reading it.
    pub fn import_file(pool: &mut DbPool, path: &Path, opts: ImportOptions) -> ImportResult {
        let is_json = path
            .extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            return ImportResult::failed(format!(
                "Invalid file: '{}' is not a .json file",
                path.display()
            ));
        }

        match fs::read_to_string(path) {
            Ok(text) => Self::import_str(pool, &text, opts),
            Err(e) => ImportResult::failed(format!("Could not read '{}': {}", path.display(), e)),
        }
    }

    pub fn import_str(pool: &mut DbPool, text: &str, opts: ImportOptions) -> ImportResult {
        match serde_json::from_str::<Value>(text) {
            Ok(v) => Self::import_value(pool, &v, opts),
            Err(e) => ImportResult::failed(format!("Invalid file: not valid JSON ({})", e)),
        }
    }

    /// Best-effort import: bad items are reported and skipped, the rest is stored.
    /// A structurally invalid document is rejected before the store is touched.
    pub fn import_value(pool: &mut DbPool, data: &Value, opts: ImportOptions) -> ImportResult {
        let entries = match validate_structure(data) {
            Ok(e) => e,
            Err(reason) => return ImportResult::failed(reason),
        };

        let existing = match load_all_sessions(&pool.conn) {
            Ok(v) => v,
            Err(e) => return ImportResult::failed(format!("Could not read existing sessions: {}", e)),
        };
        let mut seen: HashSet<(i64, u32, u32)> = existing.iter().map(|s| s.dedup_key()).collect();

        let mut result = ImportResult {
            success: true,
            ..Default::default()
        };

        let tx = match pool.conn.transaction() {
            Ok(tx) => tx,
            Err(e) => return ImportResult::failed(format!("Storage unavailable: {}", e)),
        };

        for (i, entry) in entries.iter().enumerate() {
            let n = i + 1;
            let candidate = match parse_entry(entry) {
                Ok((c, warning)) => {
                    if let Some(w) = warning {
                        result.errors.push(format!("Session {}: {}", n, w));
                    }
                    c
                }
                Err(reason) => {
                    result.errors.push(format!("Session {}: {}", n, reason));
                    continue;
                }
            };

            let key = (
                candidate.date.timestamp_millis(),
                candidate.push_ups,
                candidate.duration,
            );
            if seen.contains(&key) {
                result.duplicates += 1;
                continue;
            }

            match insert_session(&tx, &candidate) {
                Ok(_) => {
                    seen.insert(key);
                    result.imported += 1;
                }
                Err(e) => result.errors.push(format!("Session {}: {}", n, e)),
            }
        }

        if opts.with_settings
            && let Some(settings) = data.get("settings").filter(|s| !s.is_null())
        {
            match serde_json::from_value::<SettingsPatch>(settings.clone()) {
                Ok(patch) => {
                    let applied = load_settings(&tx)
                        .map(Option::unwrap_or_default)
                        .and_then(|current| current.merged(&patch))
                        .and_then(|merged| upsert_settings(&tx, &merged));
                    if let Err(e) = applied {
                        result.errors.push(format!("Settings: {}", e));
                    }
                }
                Err(e) => result.errors.push(format!("Settings: {}", e)),
            }
        }

        if let Err(e) = tx.commit() {
            return ImportResult::failed(format!("Import could not be saved: {}", e));
        }

        ttlog_soft(
            &pool.conn,
            "import",
            &format!("{} sessions", entries.len()),
            &format!(
                "imported {}, duplicates {}, errors {}",
                result.imported,
                result.duplicates,
                result.errors.len()
            ),
        );

        result
    }
}

/// Locates the session list and checks the first entries for required numeric fields.
fn validate_structure(data: &Value) -> Result<&Vec<Value>, String> {
    let entries = match data {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("sessions") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err("Invalid file format: 'sessions' must be a list".into()),
            None => return Err("Invalid file format: no 'sessions' list found".into()),
        },
        _ => return Err("Invalid file format: expected an object with a 'sessions' list".into()),
    };

    for (i, entry) in entries.iter().take(PROBE_SIZE).enumerate() {
        let obj = entry
            .as_object()
            .ok_or_else(|| format!("Invalid file format: session {} is not an object", i + 1))?;
        for field in ["pushUps", "duration"] {
            if !obj.get(field).map(Value::is_number).unwrap_or(false) {
                return Err(format!(
                    "Invalid file format: session {} has no numeric '{}'",
                    i + 1,
                    field
                ));
            }
        }
    }

    Ok(entries)
}

fn count_field(obj: &Map<String, Value>, field: &str) -> Result<u32, String> {
    let v = obj
        .get(field)
        .ok_or_else(|| format!("missing '{}'", field))?;
    let n = v
        .as_u64()
        .or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })
        .ok_or_else(|| format!("invalid '{}': {}", field, v))?;
    u32::try_from(n).map_err(|_| format!("'{}' out of range: {}", field, n))
}

fn parse_date_value(v: Option<&Value>) -> Result<DateTime<Utc>, String> {
    match v {
        Some(Value::String(s)) => parse_flexible(s).ok_or_else(|| format!("invalid date '{}'", s)),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| format!("invalid date '{}'", n)),
        Some(other) => Err(format!("invalid date '{}'", other)),
        None => Err("invalid date: missing".into()),
    }
}

/// Turns one document entry into an insertable session, plus an optional
/// non-fatal remark.
fn parse_entry(entry: &Value) -> Result<(NewSession, Option<String>), String> {
    let obj = entry.as_object().ok_or("not an object")?;

    let push_ups = count_field(obj, "pushUps")?;
    let duration = count_field(obj, "duration")?;
    if push_ups == 0 {
        return Err("no push-ups recorded, skipped".into());
    }
    let date = parse_date_value(obj.get("date"))?;

    let goal = obj
        .get("goal")
        .and_then(Value::as_u64)
        .and_then(|g| u32::try_from(g).ok());

    let mut remark = None;
    let sets = match obj.get("sets") {
        None | Some(Value::Null) => None,
        Some(v) => match serde_json::from_value::<Vec<SetRecord>>(v.clone()) {
            Ok(s) if s.is_empty() => None,
            Ok(s) => Some(s),
            Err(e) => {
                remark = Some(format!("malformed sets ignored ({})", e));
                None
            }
        },
    };

    Ok((
        NewSession {
            date,
            push_ups,
            duration,
            goal,
            sets,
        },
        remark,
    ))
}
