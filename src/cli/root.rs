//! Root command line: the fixed `boca` entry point
//!
//! The root owns the mapping from command name to [`Command`]. It is built
//! fresh for every invocation, so the clap tree is assembled at run time from
//! whatever built-in and custom commands were registered.

use crate::cli::builtins::builtin_commands;
use crate::cli::command::{Command, CommandKind, FORWARDED_ARGS, Handler};
use crate::custom::Discovered;
use crate::error::BocaError;
use crate::operations::shell::run_script;
use crate::system::System;
use anyhow::{Context as _, Result};
use clap::{Arg, ArgAction, ArgMatches};
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::io::Write;
use tracing::{debug, warn};

/// Program name used in usage lines
pub const ROOT_NAME: &str = "boca";

/// The top-level group combining built-in and custom commands
pub struct RootCli<'sys> {
    commands: BTreeMap<String, Command>,
    system: &'sys dyn System,
}

impl<'sys> RootCli<'sys> {
    /// Create a root with no commands at all
    #[must_use]
    pub fn new(system: &'sys dyn System) -> Self {
        Self {
            commands: BTreeMap::new(),
            system,
        }
    }

    /// Create a root holding the built-in commands
    #[must_use]
    pub fn with_builtins(system: &'sys dyn System) -> Self {
        let mut cli = Self::new(system);
        for command in builtin_commands() {
            cli.register(command);
        }
        cli
    }

    /// Register a command under its name, returning the one it replaced
    pub fn register(&mut self, command: Command) -> Option<Command> {
        self.commands.insert(command.name().to_owned(), command)
    }

    /// Merge discovered custom commands into the root
    ///
    /// Custom commands replace built-ins of the same name. When two custom
    /// commands share a name, the one discovered last wins.
    pub fn merge(&mut self, discovered: Vec<Discovered>) {
        let mut custom_names = HashSet::new();

        for Discovered {
            identifier,
            command,
        } in discovered
        {
            let name = command.name().to_owned();
            let is_repeat = !custom_names.insert(name.clone());

            if self.register(command).is_some() {
                if is_repeat {
                    warn!(
                        "Custom command '{name}' (from '{identifier}') replaces an earlier custom command with the same name"
                    );
                } else {
                    debug!("Custom command '{name}' overrides the built-in command");
                }
            } else {
                debug!("Registered custom command '{name}' from '{identifier}'");
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered command names, sorted
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Build the clap definition of the whole command line
    #[must_use]
    pub fn to_clap(&self) -> clap::Command {
        let root = clap::Command::new(ROOT_NAME)
            .bin_name(ROOT_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .about(env!("CARGO_PKG_DESCRIPTION"))
            .disable_help_subcommand(true)
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Enable verbose logging output")
                    .action(ArgAction::SetTrue)
                    .global(true),
            );

        self.commands
            .values()
            .fold(root, |root, command| root.subcommand(command.to_clap(ROOT_NAME)))
    }

    /// Parse `args` (without the program name) and run the selected command
    ///
    /// Returns the exit code. Help and version requests, and groups invoked
    /// without a subcommand, print help and return 0. Usage errors print
    /// clap's message and return 2.
    pub fn invoke<I, T>(&self, args: I, out: &mut dyn Write) -> Result<i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv = std::iter::once(OsString::from(ROOT_NAME)).chain(args.into_iter().map(Into::into));

        let mut app = self.to_clap();
        let matches = match app.try_get_matches_from_mut(argv) {
            Ok(matches) => matches,
            Err(err) => {
                write!(out, "{}", err.render()).context("Failed to write usage")?;
                return Ok(err.exit_code());
            }
        };

        let mut clap_cmd = &mut app;
        let mut current_matches = &matches;
        let mut children = &self.commands;

        loop {
            let Some((name, sub_matches)) = current_matches.subcommand() else {
                write!(out, "{}", clap_cmd.render_help()).context("Failed to write help")?;
                return Ok(0);
            };

            let command = children.get(name).ok_or_else(|| {
                return BocaError::command(format!("No such command: {name}"));
            })?;
            clap_cmd = clap_cmd.find_subcommand_mut(name).ok_or_else(|| {
                return BocaError::command(format!("No such command: {name}"));
            })?;
            current_matches = sub_matches;

            match *command.kind() {
                CommandKind::Group(ref grandchildren) => children = grandchildren,
                CommandKind::Leaf(ref handler) => {
                    debug!("Invoking command '{}'", clap_cmd.get_bin_name().unwrap_or(name));
                    return self.dispatch(handler, current_matches, out);
                }
            }
        }
    }

    fn dispatch(&self, handler: &Handler, matches: &ArgMatches, out: &mut dyn Write) -> Result<i32> {
        match *handler {
            Handler::Builtin { run, .. } => run(matches, self.system, out),
            Handler::Echo(ref text) => {
                writeln!(out, "{text}").context("Failed to write command output")?;
                Ok(0)
            }
            Handler::Run(ref script) => {
                let args: Vec<String> = matches
                    .get_many::<String>(FORWARDED_ARGS)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
                let working_dir = self
                    .system
                    .current_dir()
                    .context("Failed to determine the current directory")?;
                run_script(script, &args, &working_dir, out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    fn invoke(cli: &RootCli<'_>, args: &[&str]) -> (i32, String) {
        let mut out = Vec::new();
        let code = cli.invoke(args.iter().copied(), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    fn animals() -> Command {
        let mut group = Command::group("animals").with_help("Animal commands");
        group.add_command(Command::leaf("cats", Handler::Echo("Cats!".to_string())));
        group
    }

    #[test]
    fn test_builtins_are_registered() {
        let system = MockSystem::new();
        let cli = RootCli::with_builtins(&system);

        assert!(cli.command_names().any(|name| name == "init:custom"));
    }

    #[test]
    fn test_group_without_subcommand_prints_usage() {
        let system = MockSystem::new();
        let mut cli = RootCli::new(&system);
        cli.register(animals());

        let (code, output) = invoke(&cli, &["animals"]);

        assert_eq!(code, 0);
        assert!(output.contains("Usage: boca animals"), "{output}");
        assert!(output.contains("cats"));
    }

    #[test]
    fn test_nested_leaf_runs_handler() {
        let system = MockSystem::new();
        let mut cli = RootCli::new(&system);
        cli.register(animals());

        let (code, output) = invoke(&cli, &["animals", "cats"]);

        assert_eq!(code, 0);
        assert_eq!(output, "Cats!\n");
    }

    #[test]
    fn test_unknown_command_is_usage_error() {
        let system = MockSystem::new();
        let mut cli = RootCli::new(&system);
        cli.register(animals());

        let (code, output) = invoke(&cli, &["cars"]);

        assert_eq!(code, 2);
        assert!(output.contains("Usage: boca"), "{output}");
    }

    #[test]
    fn test_no_arguments_prints_root_help() {
        let system = MockSystem::new();
        let cli = RootCli::with_builtins(&system);

        let (code, output) = invoke(&cli, &[]);

        assert_eq!(code, 0);
        assert!(output.contains("Usage: boca"));
        assert!(output.contains("init:custom"));
    }

    #[test]
    fn test_merge_custom_overrides_builtin() {
        let system = MockSystem::new();
        let mut cli = RootCli::with_builtins(&system);

        cli.merge(vec![Discovered {
            identifier: "init_custom".to_string(),
            command: Command::leaf("init:custom", Handler::Echo("overridden".to_string())),
        }]);

        let (code, output) = invoke(&cli, &["init:custom"]);
        assert_eq!(code, 0);
        assert_eq!(output, "overridden\n");
    }

    #[test]
    fn test_merge_last_custom_wins() {
        let system = MockSystem::new();
        let mut cli = RootCli::new(&system);

        cli.merge(vec![
            Discovered {
                identifier: "first".to_string(),
                command: Command::leaf("dup", Handler::Echo("first".to_string())),
            },
            Discovered {
                identifier: "second".to_string(),
                command: Command::leaf("dup", Handler::Echo("second".to_string())),
            },
        ]);

        let (_, output) = invoke(&cli, &["dup"]);
        assert_eq!(output, "second\n");
    }

    #[test]
    fn test_echo_command_rejects_extra_arguments() {
        let system = MockSystem::new();
        let mut cli = RootCli::new(&system);
        cli.register(Command::leaf("cats", Handler::Echo("Cats!".to_string())));

        let (code, _) = invoke(&cli, &["cats", "extra"]);
        assert_eq!(code, 2);
    }

    #[test]
    fn test_version_flag() {
        let system = MockSystem::new();
        let cli = RootCli::new(&system);

        let (code, output) = invoke(&cli, &["--version"]);

        assert_eq!(code, 0);
        assert!(output.contains(ROOT_NAME));
    }
}
