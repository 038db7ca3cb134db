use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{check_values, migrate_config, missing_keys};
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            if path.exists() {
                ConfigLogic::print(&path)?;
            } else {
                println!("{}", serde_yaml::to_string(cfg)?);
            }
        }

        if *check {
            if path.exists() {
                let missing = missing_keys(&path)?;
                if missing.is_empty() {
                    success("All configuration fields are present.");
                } else {
                    warning(format!(
                        "Missing fields: {} (run `config --migrate`)",
                        missing.join(", ")
                    ));
                }
            } else {
                info(format!("No config file at {}: defaults in use.", path.display()));
            }

            let problems = check_values(cfg);
            if problems.is_empty() {
                success("Configuration values are valid.");
            }
            for p in problems {
                warning(p);
            }
        }

        if *migrate {
            if path.exists() {
                let added = migrate_config(&path)?;
                if added.is_empty() {
                    info("Configuration already up to date.");
                } else {
                    success(format!("Added fields: {}", added.join(", ")));
                }
            } else {
                info(format!("No config file at {}: run `init` first.", path.display()));
            }
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
            success(format!("Configuration file edited: {}", path.display()));
        }
    }

    Ok(())
}
