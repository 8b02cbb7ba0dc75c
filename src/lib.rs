//! `boca` - a command-line tool that can be extended with custom commands
//!
//! The root command line is assembled at start-up from the built-in commands
//! plus the commands exported by a user-editable custom commands file
//! (`boca.yaml`, or the file named by `BOCA_CUSTOM_COMMANDS`).

pub mod cli;
pub mod custom;
pub mod error;
pub mod operations;
pub mod system;

use anyhow::Result;
use cli::RootCli;
use custom::{LoaderConfig, load_custom_commands};
use std::ffi::OsString;
use std::io::Write;
use system::System;

/// Build the root command line, reading the environment for custom commands
///
/// # Errors
///
/// Returns an error if the custom commands file named by the environment is
/// missing, or if the custom commands file fails to load.
pub fn create_cli(system: &dyn System) -> Result<RootCli<'_>> {
    let config = LoaderConfig::from_env(system)?;
    create_cli_with(&config, system)
}

/// Build the root command line from an explicit loader configuration
pub fn create_cli_with<'sys>(config: &LoaderConfig, system: &'sys dyn System) -> Result<RootCli<'sys>> {
    let mut cli = RootCli::with_builtins(system);
    let discovered = load_custom_commands(config, system)?;
    cli.merge(discovered);
    Ok(cli)
}

/// Main entry point for the boca library
///
/// Builds the command line and invokes it with `args` (without the program
/// name), returning the exit code.
pub fn run<I, T>(system: &dyn System, args: I, out: &mut dyn Write) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cli = create_cli(system)?;
    let code = cli.invoke(args, out)?;
    out.flush()?;
    Ok(code)
}
