use crate::export::ExportFormat;
use clap::{ArgGroup, Parser, Subcommand};

/// Command-line interface definition for repcount
/// Offline-first push-up counter backed by SQLite
#[derive(Parser)]
#[command(
    name = "repcount",
    version = env!("CARGO_PKG_VERSION"),
    about = "An offline-first push-up counter: sessions, statistics, achievements and a cached app shell",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the cache storage path
    #[arg(global = true, long = "cache-db")]
    pub cache_db: Option<String>,

    /// Override the deployed app origin (directory or http(s) URL)
    #[arg(global = true, long = "origin")]
    pub origin: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Accepts on/off, true/false, yes/no, 1/0.
pub fn parse_switch(s: &str) -> Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected on/off, got '{}'", other)),
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", value_name = "OPERATION", help = "Only rows of this operation (add, del, reminder, …)")]
        operation: Option<String>,

        #[arg(long, value_name = "N", help = "Only the N most recent rows")]
        last: Option<usize>,
    },

    /// Record a finished session
    Add {
        /// Push-ups done (must be > 0)
        push_ups: u32,

        #[arg(long, short = 'd', default_value_t = 0, help = "Duration in seconds")]
        duration: u32,

        #[arg(
            long,
            value_name = "DATETIME",
            help = "Session start (YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339; default: now)"
        )]
        date: Option<String>,

        #[arg(long, help = "Daily goal to record with the session (default: current goal)")]
        goal: Option<u32>,
    },

    /// Interactive rep counter
    Count {
        #[arg(long, help = "Goal for this session (default: daily goal)")]
        goal: Option<u32>,
    },

    /// List sessions
    List {
        #[arg(
            long,
            short,
            value_name = "RANGE",
            help = "today, YYYY-MM-DD, YYYY-MM or FROM:TO (dates inclusive)"
        )]
        range: Option<String>,
    },

    /// Delete sessions
    #[command(group(
        ArgGroup::new("target")
            .required(true)
            .args(["id", "date", "older_than", "all"])
    ))]
    Del {
        #[arg(long, num_args = 1.., value_delimiter = ',', help = "Session id(s)")]
        id: Vec<i64>,

        #[arg(long, help = "Every session on this local day (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "older-than", value_name = "DAYS", help = "Sessions started before N days ago")]
        older_than: Option<u32>,

        #[arg(long, help = "All sessions and achievements (settings are kept)")]
        all: bool,
    },

    /// Wipe sessions, achievements and settings, then restore default settings
    Reset {
        #[arg(long, short = 'f', help = "Do not ask for confirmation")]
        force: bool,
    },

    /// Show statistics
    Stats {
        #[arg(long, short, help = "week, month, year or all (default from config)")]
        period: Option<String>,
    },

    /// Show or change app settings
    Settings {
        #[arg(long, help = "Print current settings")]
        show: bool,

        #[arg(long, help = "Daily goal (1-1000)")]
        goal: Option<u32>,

        #[arg(long, value_name = "on|off", value_parser = parse_switch)]
        sound: Option<bool>,

        #[arg(long, value_name = "on|off", value_parser = parse_switch)]
        dark: Option<bool>,

        #[arg(long = "auto-save", value_name = "on|off", value_parser = parse_switch)]
        auto_save: Option<bool>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long, value_name = "HH:MM", help = "Reminder time, empty to disable")]
        reminder: Option<String>,

        #[arg(
            long,
            value_name = "DAYS",
            help = "Reminder weekdays, 0=Monday (e.g. 0,2,4), empty for every day"
        )]
        days: Option<String>,
    },

    /// List achievements and unlock newly earned ones
    Achievements,

    /// Import sessions from a JSON export
    Import {
        file: String,

        #[arg(long = "with-settings", help = "Also apply the settings stored in the file")]
        with_settings: bool,
    },

    /// Export sessions and settings
    Export {
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Offline cache controller
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Active, waiting and installing generations
    Status,
    /// Re-fetch the definition file and install a new generation if any
    Update,
    /// Promote the waiting generation
    SkipWaiting,
    /// Fetch a path through the controller
    Get {
        path: String,

        #[arg(long, help = "Simulate a lost connection")]
        offline: bool,

        #[arg(long, help = "Fetch as a page navigation")]
        navigate: bool,

        #[arg(long, default_value = "GET")]
        method: String,
    },
    /// List cache buckets and their entry counts
    Buckets,
}
