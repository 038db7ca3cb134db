use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        println!("{}", content);
        Ok(())
    }

    /// Opens `path` in the requested editor, then $EDITOR/$VISUAL, then a
    /// platform default.
    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });
        let ed = editor.clone().unwrap_or_else(|| default_editor.clone());

        match Command::new(&ed).arg(path).status() {
            Ok(s) if s.success() => Ok(()),
            _ if ed != default_editor => {
                eprintln!(
                    "⚠️  Editor '{}' not available, falling back to '{}'",
                    ed, default_editor
                );
                let status = Command::new(&default_editor)
                    .arg(path)
                    .status()
                    .map_err(|e| AppError::Config(e.to_string()))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(AppError::Config(format!("editor '{}' failed", default_editor)))
                }
            }
            Ok(_) => Err(AppError::Config(format!("editor '{}' failed", ed))),
            Err(e) => Err(AppError::Config(e.to_string())),
        }
    }
}
