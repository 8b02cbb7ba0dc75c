//! Starter custom commands file for `init:custom`

use crate::custom::CUSTOM_COMMANDS_FILE_NAME;
use crate::error::BocaError;
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents written by `init:custom`
pub const SCAFFOLD_TEMPLATE: &str = include_str!("scaffold.yaml");

/// What `generate_scaffold` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    /// A new file was written at this path
    Generated(PathBuf),

    /// A file was already present at this path and was left alone
    AlreadyExists(PathBuf),
}

/// Write the starter custom commands file into `directory`
///
/// Relative directories are resolved against the current directory. An
/// existing file is never overwritten.
///
/// # Errors
///
/// Returns an error if:
/// - The target directory does not exist
/// - The file cannot be written
pub fn generate_scaffold(system: &dyn System, directory: &Path) -> Result<ScaffoldOutcome> {
    let directory = if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        system
            .current_dir()
            .context("Failed to determine the current directory")?
            .join(directory)
    };
    // `components()` drops interior `.` segments
    let directory: PathBuf = directory.components().collect();

    if !system.is_dir(&directory) {
        return Err(BocaError::filesystem(format!(
            "Target directory does not exist: {}",
            directory.display()
        ))
        .into());
    }

    let path = directory.join(CUSTOM_COMMANDS_FILE_NAME);
    if system.exists(&path) {
        debug!("Not overwriting existing {}", path.display());
        return Ok(ScaffoldOutcome::AlreadyExists(path));
    }

    system
        .write(&path, SCAFFOLD_TEMPLATE.as_bytes())
        .map_err(|e| BocaError::filesystem(format!("Failed to write {}: {e}", path.display())))?;

    Ok(ScaffoldOutcome::Generated(path))
}
