use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::settings::{load_settings, merge_settings};
use crate::errors::AppResult;
use crate::models::settings::{AppSettings, SettingsPatch};

pub struct SettingsLogic;

impl SettingsLogic {
    /// Stored settings, or in-memory defaults (not persisted) when none exist yet.
    pub fn get_settings(pool: &mut DbPool) -> AppResult<AppSettings> {
        Ok(load_settings(&pool.conn)?.unwrap_or_default())
    }

    /// Shallow-merges `patch` over the current settings and stores the result.
    pub fn update_settings(pool: &mut DbPool, patch: &SettingsPatch) -> AppResult<AppSettings> {
        let merged = merge_settings(&pool.conn, patch)?;
        let json = serde_json::to_string(patch).unwrap_or_default();
        ttlog_soft(&pool.conn, "settings", "update", &json);
        Ok(merged)
    }
}
