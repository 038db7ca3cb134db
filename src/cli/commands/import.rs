use crate::cli::commands::achievements::announce_unlocks;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{ImportLogic, ImportOptions};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, toast_error, warning};
use crate::utils::clock::SystemClock;
use std::path::Path;

/// Import never aborts the process: failures are reported, not returned.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import {
        file,
        with_settings,
    } = cmd
    {
        let mut pool = DbPool::open(&cfg.database)?;
        let result = ImportLogic::import_file(
            &mut pool,
            Path::new(file),
            ImportOptions {
                with_settings: *with_settings,
            },
        );

        if !result.success {
            let reason = result.errors.first().cloned().unwrap_or_default();
            toast_error("Import failed", reason);
            return Ok(());
        }

        success(format!(
            "Import completed: {} imported, {} duplicates, {} errors",
            result.imported,
            result.duplicates,
            result.errors.len()
        ));
        for e in &result.errors {
            warning(e);
        }

        if result.imported > 0 {
            announce_unlocks(&mut pool, &SystemClock)?;
        }
    }
    Ok(())
}
