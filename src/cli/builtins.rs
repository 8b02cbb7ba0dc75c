//! Built-in commands of the root command line

use crate::cli::command::{Command, Handler};
use crate::custom::scaffold::{ScaffoldOutcome, generate_scaffold};
use crate::system::System;
use anyhow::{Context as _, Result};
use clap::{ArgMatches, Args, FromArgMatches as _};
use std::io::Write;
use std::path::PathBuf;

/// Name of the scaffold command
pub const INIT_CUSTOM: &str = "init:custom";

/// Arguments of `init:custom`
#[derive(Args, Debug, Clone)]
pub struct InitCustomArgs {
    /// Directory to create the custom commands file in
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,
}

/// All built-in commands
#[must_use]
pub fn builtin_commands() -> Vec<Command> {
    vec![
        Command::leaf(
            INIT_CUSTOM,
            Handler::Builtin {
                augment: InitCustomArgs::augment_args,
                run: run_init_custom,
            },
        )
        .with_help(
            "Generate a custom commands file.\n\n\
            Writes a starter boca.yaml that defines example commands. Commands \
            declared in it are picked up the next time boca starts in that directory.",
        ),
    ]
}

fn run_init_custom(matches: &ArgMatches, system: &dyn System, out: &mut dyn Write) -> Result<i32> {
    let args = InitCustomArgs::from_arg_matches(matches)?;

    match generate_scaffold(system, &args.directory)? {
        ScaffoldOutcome::Generated(path) => {
            writeln!(out, "Generated custom commands file: {}", path.display())
                .and_then(|()| {
                    writeln!(
                        out,
                        "Open the file {} to start adding your own commands.",
                        path.display()
                    )
                })
                .context("Failed to write command output")?;
        }
        ScaffoldOutcome::AlreadyExists(path) => {
            writeln!(out, "Custom commands file already exists: {}", path.display())
                .and_then(|()| writeln!(out, "Nothing to do; the existing file was left untouched."))
                .context("Failed to write command output")?;
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::root::RootCli;
    use crate::system::MockSystem;
    use std::path::Path;

    #[test]
    fn test_init_custom_generates_file() {
        let system = MockSystem::new().with_dir("/work");
        let cli = RootCli::with_builtins(&system);
        let mut out = Vec::new();

        let code = cli.invoke(["init:custom", "-d", "/work"], &mut out).unwrap();
        let output = String::from_utf8(out).unwrap().to_lowercase();

        assert_eq!(code, 0, "{output}");
        assert!(output.contains("generated"));
        assert!(output.contains("open the file"));
        assert!(system.is_file(Path::new("/work/boca.yaml")));
    }

    #[test]
    fn test_init_custom_defaults_to_current_dir() {
        let system = MockSystem::new().with_current_dir("/project");
        let cli = RootCli::with_builtins(&system);
        let mut out = Vec::new();

        let code = cli.invoke(["init:custom"], &mut out).unwrap();

        assert_eq!(code, 0);
        assert!(system.is_file(Path::new("/project/boca.yaml")));
    }

    #[test]
    fn test_init_custom_keeps_existing_file() {
        let system = MockSystem::new().with_file("/work/boca.yaml", b"# mine\n");
        let cli = RootCli::with_builtins(&system);
        let mut out = Vec::new();

        let code = cli.invoke(["init:custom", "--directory", "/work"], &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert_eq!(code, 0);
        assert!(output.contains("already exists"));
        assert_eq!(system.file_contents("/work/boca.yaml").unwrap(), b"# mine\n");
    }
}
