//! Custom command loading
//!
//! Resolves the custom commands file, loads it and discovers the commands it
//! exports so they can be merged into the root command line.

pub mod module;
pub mod scaffold;
pub mod schema;

use crate::cli::command::Command;
use crate::error::BocaError;
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that points at a custom commands file
pub const CUSTOM_COMMANDS_ENV_VAR: &str = "BOCA_CUSTOM_COMMANDS";

/// File name looked up in the default directory and written by `init:custom`
pub const CUSTOM_COMMANDS_FILE_NAME: &str = "boca.yaml";

/// A command exported by a custom commands file
#[derive(Debug, Clone)]
pub struct Discovered {
    /// Key the command was bound to in the file
    pub identifier: String,

    /// The command, already named
    pub command: Command,
}

/// Where to look for custom commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Explicit file to load; missing files are an error
    pub path_override: Option<PathBuf>,

    /// Directory searched for `boca.yaml` when there is no override
    pub default_dir: PathBuf,
}

impl LoaderConfig {
    /// Read the configuration from the environment
    ///
    /// An empty `BOCA_CUSTOM_COMMANDS` counts as unset.
    pub fn from_env(system: &dyn System) -> Result<Self> {
        let default_dir = system
            .current_dir()
            .context("Failed to determine the current directory")?;
        let path_override = system
            .env_var(CUSTOM_COMMANDS_ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            path_override,
            default_dir,
        })
    }

    /// Path of the file to load, or `None` when there is nothing to load
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the override points at something
    /// that is not a file.
    pub fn resolve(&self, system: &dyn System) -> Result<Option<PathBuf>> {
        if let Some(path) = self.path_override.as_ref() {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                system
                    .current_dir()
                    .context("Failed to determine the current directory")?
                    .join(path)
            };

            if !system.is_file(&path) {
                return Err(BocaError::configuration(format!(
                    "Custom commands file not found: {}\n\
                    {CUSTOM_COMMANDS_ENV_VAR} must point at an existing file",
                    path.display()
                ))
                .into());
            }
            return Ok(Some(path));
        }

        let default_path = self.default_dir.join(CUSTOM_COMMANDS_FILE_NAME);
        if system.is_file(&default_path) {
            Ok(Some(default_path))
        } else {
            debug!("No custom commands file at {}", default_path.display());
            Ok(None)
        }
    }
}

/// Load the custom commands selected by `config`
///
/// Returns no commands when there is no override and no default file.
pub fn load_custom_commands(config: &LoaderConfig, system: &dyn System) -> Result<Vec<Discovered>> {
    let Some(path) = config.resolve(system)? else {
        return Ok(Vec::new());
    };

    let discovered = load_module(system, &path)?;
    debug!(
        "Loaded {} custom command(s) from {}",
        discovered.len(),
        path.display()
    );
    Ok(discovered)
}

/// Read and parse one custom commands file
pub fn load_module(system: &dyn System, path: &Path) -> Result<Vec<Discovered>> {
    let origin = path.display().to_string();

    let content = system.read_to_string(path).map_err(|e| {
        return BocaError::module_load(origin.clone(), format!("Failed to read file: {e}"));
    })?;

    module::parse_module(&content, &origin)
        .map_err(|e| BocaError::module_load(origin.clone(), format!("{e:#}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn test_from_env_reads_override_and_cwd() {
        let system = MockSystem::new()
            .with_current_dir("/project")
            .with_env(CUSTOM_COMMANDS_ENV_VAR, "/elsewhere/cmds.yaml");

        let config = LoaderConfig::from_env(&system).unwrap();

        assert_eq!(config.path_override, Some(PathBuf::from("/elsewhere/cmds.yaml")));
        assert_eq!(config.default_dir, PathBuf::from("/project"));
    }

    #[test]
    fn test_from_env_treats_empty_override_as_unset() {
        let system = MockSystem::new().with_env(CUSTOM_COMMANDS_ENV_VAR, "");

        let config = LoaderConfig::from_env(&system).unwrap();
        assert!(config.path_override.is_none());
    }

    #[test]
    fn test_missing_default_is_skipped() {
        let system = MockSystem::new().with_dir("/project");
        let config = LoaderConfig {
            path_override: None,
            default_dir: PathBuf::from("/project"),
        };

        assert!(load_custom_commands(&config, &system).unwrap().is_empty());
    }

    #[test]
    fn test_missing_override_is_fatal() {
        let system = MockSystem::new();
        let config = LoaderConfig {
            path_override: Some(PathBuf::from("/missing/boca.yaml")),
            default_dir: PathBuf::from("/"),
        };

        let err = load_custom_commands(&config, &system).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BocaError>(),
            Some(BocaError::Configuration { .. })
        ));
    }

    #[test]
    fn test_override_wins_over_default() {
        let system = MockSystem::new()
            .with_file("/project/boca.yaml", b"local:\n  type: command\n  echo: local\n")
            .with_file("/shared/cmds.yaml", b"shared:\n  type: command\n  echo: shared\n");
        let config = LoaderConfig {
            path_override: Some(PathBuf::from("/shared/cmds.yaml")),
            default_dir: PathBuf::from("/project"),
        };

        let discovered = load_custom_commands(&config, &system).unwrap();

        assert_eq!(discovered.len(), 1);
        assert_eq!(discovered[0].command.name(), "shared");
    }

    #[test]
    fn test_relative_override_resolves_against_cwd() {
        let system = MockSystem::new()
            .with_current_dir("/project")
            .with_file("/project/tools/cmds.yaml", b"");
        let config = LoaderConfig {
            path_override: Some(PathBuf::from("tools/cmds.yaml")),
            default_dir: PathBuf::from("/project"),
        };

        let resolved = config.resolve(&system).unwrap();
        assert_eq!(resolved, Some(PathBuf::from("/project/tools/cmds.yaml")));
    }

    #[test]
    fn test_parse_failure_is_module_load_error() {
        let system = MockSystem::new().with_file("/project/boca.yaml", b"cats: [\n");
        let config = LoaderConfig {
            path_override: None,
            default_dir: PathBuf::from("/project"),
        };

        let err = load_custom_commands(&config, &system).unwrap_err();
        match err.downcast_ref::<BocaError>() {
            Some(BocaError::ModuleLoad { path, .. }) => assert_eq!(path, "/project/boca.yaml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
