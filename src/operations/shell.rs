//! Shell execution for `run` handlers of custom commands

use crate::error::BocaError;
use anyhow::{Context as _, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Name passed as `$0` to scripts, so `$1..` line up with the forwarded arguments
const SCRIPT_NAME: &str = "boca";

/// Run `script` through the platform shell in `working_dir`
///
/// `args` are forwarded as positional parameters. Standard output is captured
/// and written to `out`; standard error is inherited. Returns the script's
/// exit code (1 when it was terminated by a signal).
pub fn run_script(
    script: &str,
    args: &[String],
    working_dir: &Path,
    out: &mut dyn Write,
) -> Result<i32> {
    if script.trim().is_empty() {
        return Err(BocaError::command("Script is empty").into());
    }

    if !working_dir.is_dir() {
        return Err(BocaError::filesystem(format!(
            "Working directory does not exist: {}",
            working_dir.display()
        ))
        .into());
    }

    let (shell, mut shell_args) = get_shell_command();
    shell_args.push(script.to_owned());
    if !cfg!(target_os = "windows") {
        shell_args.push(SCRIPT_NAME.to_owned());
    }
    shell_args.extend(args.iter().cloned());

    debug!("Running script in {}: {}", working_dir.display(), script);

    let output = Command::new(&shell)
        .args(&shell_args)
        .current_dir(working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| BocaError::command(format!("Failed to execute '{script}': {e}")))?;

    out.write_all(&output.stdout)
        .context("Failed to write command output")?;

    let code = output.status.code().unwrap_or(1);
    if code != 0 {
        debug!("Script exited with code {code}: {script}");
    }

    Ok(code)
}

/// Get the appropriate shell command for the current platform
fn get_shell_command() -> (String, Vec<String>) {
    if cfg!(target_os = "windows") {
        return ("cmd".to_owned(), vec!["/C".to_owned()]);
    } else {
        return ("sh".to_owned(), vec!["-c".to_owned()]);
    }
}
