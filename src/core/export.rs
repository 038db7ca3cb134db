use crate::core::stats::total_push_ups;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries::load_all_sessions;
use crate::db::settings::load_settings;
use crate::errors::AppResult;
use crate::export::{
    EXPORT_VERSION, ExportDocument, ExportFormat, ensure_writable, export_csv, export_json,
};
use crate::utils::clock::Clock;
use chrono::Utc;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Snapshot of every session (newest first) plus the stored settings.
    pub fn build_document(pool: &mut DbPool, clock: &dyn Clock) -> AppResult<ExportDocument> {
        let sessions = load_all_sessions(&pool.conn)?;
        let settings = load_settings(&pool.conn)?;

        Ok(ExportDocument {
            version: EXPORT_VERSION.to_string(),
            export_date: clock.now().with_timezone(&Utc),
            total_push_ups: total_push_ups(&sessions),
            sessions,
            settings,
        })
    }

    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        force: bool,
        clock: &dyn Clock,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_writable(path, force)?;

        let doc = Self::build_document(pool, clock)?;
        match format {
            ExportFormat::Json => export_json(&doc, path)?,
            ExportFormat::Csv => export_csv(&doc, path)?,
        }

        ttlog_soft(
            &pool.conn,
            "export",
            file,
            &format!("{} sessions as {}", doc.sessions.len(), format.as_str()),
        );
        Ok(doc.sessions.len())
    }
}
