//! Custom commands file parsing and export discovery
//!
//! A custom commands file is a YAML mapping from identifiers to values. Values
//! that are mappings with a `type` of `command` or `group` are command
//! exports; every other binding is ignored.

use crate::cli::command::{Command, Handler};
use crate::custom::Discovered;
use crate::custom::schema::{get_schema, validate_against_schema};
use anyhow::{Context as _, Result, anyhow};
use jsonschema::Validator;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Valid command names
static NAME_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9:._-]*$"));

/// One command export as written in the file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CommandSpec {
    Command {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        help: Option<String>,
        #[serde(default)]
        short_help: Option<String>,
        #[serde(default)]
        echo: Option<String>,
        #[serde(default)]
        run: Option<String>,
    },
    Group {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        help: Option<String>,
        #[serde(default)]
        short_help: Option<String>,
        #[serde(default)]
        commands: Mapping,
    },
}

/// Parse a custom commands file and return its command exports in file order
///
/// `origin` names the file in error messages.
pub fn parse_module(content: &str, origin: &str) -> Result<Vec<Discovered>> {
    let document: Value = serde_yaml::from_str(content).map_err(|e| {
        if let Some(location) = e.location() {
            anyhow!(
                "Failed to parse {origin} at line {}, column {}: {e}",
                location.line(),
                location.column()
            )
        } else {
            anyhow!("Failed to parse {origin}: {e}")
        }
    })?;

    let bindings = match document {
        Value::Mapping(bindings) => bindings,
        Value::Null => return Ok(Vec::new()),
        _ => {
            debug!("{origin} is not a mapping; it exports no commands");
            return Ok(Vec::new());
        }
    };

    let schema = get_schema()?;
    let mut discovered = Vec::new();

    for (key, value) in bindings {
        let Value::String(identifier) = key else {
            continue;
        };
        if !is_command_export(&value) {
            debug!("Ignoring '{identifier}' in {origin}: not a command");
            continue;
        }

        let command = build_command(&schema, &identifier, value)
            .with_context(|| format!("Invalid command '{identifier}' in {origin}"))?;
        discovered.push(Discovered {
            identifier,
            command,
        });
    }

    Ok(discovered)
}

/// True when `value` declares itself as a command or group
#[must_use]
pub fn is_command_export(value: &Value) -> bool {
    let Value::Mapping(fields) = value else {
        return false;
    };
    matches!(
        fields.get("type").and_then(Value::as_str),
        Some("command" | "group")
    )
}

/// Name a command is invoked under when none is given explicitly
#[must_use]
pub fn default_command_name(identifier: &str) -> String {
    identifier.replace('_', "-")
}

fn build_command(schema: &Validator, identifier: &str, value: Value) -> Result<Command> {
    let as_json =
        serde_json::to_value(&value).context("Failed to convert command definition to JSON")?;
    validate_against_schema(schema, &as_json)?;

    let spec: CommandSpec =
        serde_yaml::from_value(value).context("Failed to read command definition")?;
    from_spec(schema, identifier, spec)
}

fn from_spec(schema: &Validator, identifier: &str, spec: CommandSpec) -> Result<Command> {
    match spec {
        CommandSpec::Command {
            name,
            help,
            short_help,
            echo,
            run,
        } => {
            let handler = match (echo, run) {
                (Some(text), None) => Handler::Echo(text),
                (None, Some(script)) => Handler::Run(script),
                (Some(_), Some(_)) => {
                    return Err(anyhow!("Cannot specify both 'echo' and 'run'"));
                }
                (None, None) => return Err(anyhow!("Must specify either 'echo' or 'run'")),
            };
            let command = Command::leaf(resolve_name(identifier, name)?, handler);
            Ok(with_help_texts(command, help, short_help))
        }
        CommandSpec::Group {
            name,
            help,
            short_help,
            commands,
        } => {
            let mut group = Command::group(resolve_name(identifier, name)?);
            for (key, value) in commands {
                let Value::String(child_identifier) = key else {
                    return Err(anyhow!("Subcommand keys must be strings"));
                };
                let child = build_command(schema, &child_identifier, value)
                    .with_context(|| format!("Invalid subcommand '{child_identifier}'"))?;
                group.add_command(child);
            }
            Ok(with_help_texts(group, help, short_help))
        }
    }
}

fn resolve_name(identifier: &str, explicit: Option<String>) -> Result<String> {
    let name = explicit.unwrap_or_else(|| default_command_name(identifier));
    let pattern = NAME_PATTERN
        .as_ref()
        .map_err(|e| anyhow!("Invalid command name pattern: {e}"))?;

    if !pattern.is_match(&name) {
        return Err(anyhow!(
            "Invalid command name '{name}'. Names start with a letter or digit \
            and contain only letters, digits, ':', '.', '_' and '-'"
        ));
    }
    Ok(name)
}

fn with_help_texts(mut command: Command, help: Option<String>, short_help: Option<String>) -> Command {
    if let Some(help) = help {
        command = command.with_help(help);
    }
    if let Some(short_help) = short_help {
        command = command.with_short_help(short_help);
    }
    command
}
