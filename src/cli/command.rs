//! Command and group model shared by built-in and custom commands

use crate::system::System;
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches};
use std::collections::BTreeMap;
use std::io::Write;

/// Argument id under which `run` handlers receive their trailing arguments
pub const FORWARDED_ARGS: &str = "args";

/// Signature of a built-in command implementation
pub type BuiltinFn = fn(&ArgMatches, &dyn System, &mut dyn Write) -> Result<i32>;

/// Signature of the function that declares a built-in's arguments
pub type AugmentFn = fn(clap::Command) -> clap::Command;

/// What happens when a leaf command is invoked
#[derive(Debug, Clone)]
pub enum Handler {
    /// Compiled-in command with its own arguments
    Builtin { augment: AugmentFn, run: BuiltinFn },

    /// Print a fixed line of text
    Echo(String),

    /// Run a shell script, forwarding trailing arguments
    Run(String),
}

/// Leaf or group
#[derive(Debug, Clone)]
pub enum CommandKind {
    Leaf(Handler),
    Group(BTreeMap<String, Command>),
}

/// A named, invocable unit of the command line
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    help: Option<String>,
    short_help: Option<String>,
    kind: CommandKind,
}

impl Command {
    /// Create a leaf command
    #[must_use]
    pub fn leaf<S: Into<String>>(name: S, handler: Handler) -> Self {
        Self {
            name: name.into(),
            help: None,
            short_help: None,
            kind: CommandKind::Leaf(handler),
        }
    }

    /// Create an empty group
    #[must_use]
    pub fn group<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            help: None,
            short_help: None,
            kind: CommandKind::Group(BTreeMap::new()),
        }
    }

    /// Set the full help text (builder pattern)
    #[must_use]
    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the one-line summary shown in command listings (builder pattern)
    #[must_use]
    pub fn with_short_help<S: Into<String>>(mut self, short_help: S) -> Self {
        self.short_help = Some(short_help.into());
        self
    }

    /// Add a child command; only meaningful for groups
    ///
    /// Returns the child previously registered under the same name. Calling
    /// this on a leaf returns the command back unchanged.
    pub fn add_command(&mut self, command: Self) -> Option<Self> {
        match self.kind {
            CommandKind::Group(ref mut children) => children.insert(command.name.clone(), command),
            CommandKind::Leaf(_) => Some(command),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// One-line summary: the explicit short help, else the first line of the help
    #[must_use]
    pub fn short_help(&self) -> Option<&str> {
        self.short_help
            .as_deref()
            .or_else(|| self.help.as_deref().and_then(|help| help.lines().next()))
    }

    #[must_use]
    pub const fn kind(&self) -> &CommandKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self.kind, CommandKind::Group(_))
    }

    /// Child command by name, for groups
    #[must_use]
    pub fn subcommand(&self, name: &str) -> Option<&Self> {
        match self.kind {
            CommandKind::Group(ref children) => children.get(name),
            CommandKind::Leaf(_) => None,
        }
    }

    /// Build the clap definition for this command
    ///
    /// `parent_bin` is the invocation prefix of the parent, e.g. `boca`.
    #[must_use]
    pub fn to_clap(&self, parent_bin: &str) -> clap::Command {
        let bin_name = format!("{parent_bin} {}", self.name);
        let cmd = clap::Command::new(self.name.clone()).bin_name(bin_name.clone());

        let mut cmd = match self.kind {
            CommandKind::Leaf(Handler::Builtin { augment, .. }) => augment(cmd),
            CommandKind::Leaf(Handler::Echo(_)) => cmd,
            CommandKind::Leaf(Handler::Run(_)) => cmd.arg(
                Arg::new(FORWARDED_ARGS)
                    .value_name("ARGS")
                    .help("Arguments passed on to the script")
                    .action(ArgAction::Append)
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true),
            ),
            CommandKind::Group(ref children) => children
                .values()
                .fold(cmd.disable_help_subcommand(true), |cmd, child| {
                    cmd.subcommand(child.to_clap(&bin_name))
                }),
        };

        // Set last so derived argument structs cannot replace the help text
        if let Some(short_help) = self.short_help() {
            cmd = cmd.about(short_help.to_owned());
        }
        if let Some(help) = self.help.as_deref() {
            cmd = cmd.long_about(help.to_owned());
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_help_falls_back_to_first_help_line() {
        let command = Command::leaf("cats", Handler::Echo("Cats!".to_string()))
            .with_help("List cats.\n\nPrints every cat we know about.");

        assert_eq!(command.short_help(), Some("List cats."));

        let command = command.with_short_help("Cats only");
        assert_eq!(command.short_help(), Some("Cats only"));
    }

    #[test]
    fn test_group_add_command_replaces_same_name() {
        let mut group = Command::group("animals");

        assert!(group.add_command(Command::leaf("cats", Handler::Echo("one".to_string()))).is_none());
        let previous = group.add_command(Command::leaf("cats", Handler::Echo("two".to_string())));

        assert!(previous.is_some());
        assert!(matches!(
            group.subcommand("cats").unwrap().kind(),
            CommandKind::Leaf(Handler::Echo(text)) if text == "two"
        ));
    }

    #[test]
    fn test_leaf_rejects_children() {
        let mut leaf = Command::leaf("cars", Handler::Echo("Cars!".to_string()));
        let child = Command::leaf("wheels", Handler::Echo("4".to_string()));

        assert!(leaf.add_command(child).is_some());
        assert!(leaf.subcommand("wheels").is_none());
    }

    #[test]
    fn test_to_clap_builds_nested_tree() {
        let mut group = Command::group("animals").with_help("Animal commands");
        group.add_command(Command::leaf("cats", Handler::Echo("Cats!".to_string())));
        group.add_command(Command::leaf("dogs", Handler::Run("echo Dogs!".to_string())));

        let cmd = group.to_clap("boca");

        assert_eq!(cmd.get_name(), "animals");
        assert_eq!(cmd.get_bin_name(), Some("boca animals"));
        let names: Vec<&str> = cmd.get_subcommands().map(clap::Command::get_name).collect();
        assert_eq!(names, vec!["cats", "dogs"]);

        let dogs = cmd.find_subcommand("dogs").unwrap();
        assert!(dogs.get_arguments().any(|arg| arg.get_id() == FORWARDED_ARGS));
    }
}
