// src/export/mod.rs

mod fs_utils;
mod json_csv;
pub mod model;

pub use model::{EXPORT_VERSION, ExportDocument, SessionCsvRow};

pub(crate) use fs_utils::ensure_writable;
pub(crate) use json_csv::{export_csv, export_json};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Common completion message for every export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}
