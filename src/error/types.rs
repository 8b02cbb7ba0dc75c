//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for boca operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BocaError {
    /// Configuration Error - an explicit setting points at something unusable
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Module Load Error - the custom commands file could not be loaded
    #[error("Failed to load custom commands from {path}: {message}")]
    ModuleLoad { path: String, message: String },

    /// Command Error - a command handler could not be run
    #[error("Command error: {message}")]
    Command { message: String },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

impl BocaError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. }
            | Self::ModuleLoad { .. }
            | Self::Command { .. }
            | Self::Filesystem { .. } => 1,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a module load error for the file at `path`
    #[inline]
    pub fn module_load<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::ModuleLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a command error
    #[inline]
    pub fn command<S: Into<String>>(message: S) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
