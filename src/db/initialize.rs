use crate::db::migrate::run_pending_migrations;
use crate::db::settings;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring the schema up to date.
/// All schema creation / upgrades are delegated to the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    run_pending_migrations(conn)?;
    Ok(())
}

/// First-run initialization: schema plus the default settings row.
pub fn init_and_seed(conn: &Connection) -> AppResult<bool> {
    init_db(conn)?;
    settings::seed_defaults_if_missing(conn)
}
