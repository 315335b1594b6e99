//! Image picker logging
//!
//! Structured logging to the console (debug builds) and a daily rolling JSON file.

mod logging;

pub use logging::{cleanup_old_logs, cleanup_logs_in, init_logging};

use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "ImagePicker", "ImagePicker")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize logging
pub fn init() -> anyhow::Result<()> {
    init_logging()
}
