use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_and_seed;
use crate::db::log;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Handle the `init` command
///
/// Creates the config directory and file (not in test mode), then the
/// database with its schema and the default settings row.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db_str = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing repcount…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", db_str);

    let conn = Connection::open(&db_path)?;
    let seeded = init_and_seed(&conn)?;

    println!("✅ Database initialized at {}", db_str);
    if seeded {
        println!("✅ Default settings created");
    }

    if let Err(e) = log::ttlog(
        &conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", db_str),
    ) {
        eprintln!("⚠️ Failed to write internal log: {}", e);
    }

    println!("🎉 repcount initialization completed!");
    Ok(())
}
