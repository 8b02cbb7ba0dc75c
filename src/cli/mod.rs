//! Command-line interface module
//! 
//! Holds the command model, the root command line and the built-in commands

pub mod builtins;
pub mod command;
pub mod root;

pub use command::{Command, CommandKind, Handler};
pub use root::RootCli;

use std::ffi::OsStr;

/// Whether `-v`/`--verbose` appears before any `--` separator
///
/// Logging is set up before the command line is assembled, so the flag is
/// looked up in the raw arguments.
pub fn verbose_requested<I, T>(args: I) -> bool
where
    I: IntoIterator<Item = T>,
    T: AsRef<OsStr>,
{
    args.into_iter()
        .map(|arg| arg.as_ref().to_owned())
        .take_while(|arg| arg != "--")
        .any(|arg| arg == "-v" || arg == "--verbose")
}
