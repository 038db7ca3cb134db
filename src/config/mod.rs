use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_cache_database")]
    pub cache_database: String,
    /// Deployed app: a `dist/` directory or an `http(s)://` base URL.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,
    /// week | month | year | all
    #[serde(default = "default_period")]
    pub default_period: String,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_cache_database() -> String {
    Config::config_dir()
        .join("repcount-cache.sqlite")
        .to_string_lossy()
        .to_string()
}
fn default_origin() -> String {
    Config::config_dir().join("dist").to_string_lossy().to_string()
}
fn default_cache_prefix() -> String {
    "repcount".to_string()
}
fn default_period() -> String {
    "week".to_string()
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            cache_database: default_cache_database(),
            origin: default_origin(),
            cache_prefix: default_cache_prefix(),
            default_period: default_period(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// `~/.repcount`, or `./.repcount` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".repcount")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("repcount.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("repcount.sqlite")
    }

    /// Reads the config file, or returns defaults when there is none.
    /// Missing optional keys take their defaults.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Creates the config directory and (outside tests) the config file.
    /// Returns the database path to initialize.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        if !is_test {
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            config.save(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(db_path)
    }
}
