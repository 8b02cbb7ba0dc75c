//! # boca
//!
//! `boca` is a command-line tool whose commands can be extended per project.
//! Besides its built-in commands it loads custom commands from a `boca.yaml`
//! file in the current directory, or from the file named by the
//! `BOCA_CUSTOM_COMMANDS` environment variable.
//!
//! ## Usage
//!
//! **Create a starter custom commands file:**
//! ```sh
//! boca init:custom -d .
//! ```
//!
//! **Run a custom command:**
//! ```sh
//! boca hello
//! BOCA_CUSTOM_COMMANDS=~/shared/boca.yaml boca project files
//! ```
//!
//! See `boca --help` for the commands available in the current directory.

use boca::error::BocaError;
use boca::system::real::RealSystem;
use std::ffi::OsString;
use std::io::Write as _;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    // Logs go to stderr so command output stays clean
    let log_level = if boca::cli::verbose_requested(&args) {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let system = RealSystem::new();
    let mut stdout = std::io::stdout().lock();

    match boca::run(&system, args, &mut stdout) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = stdout.flush();
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<BocaError>()
                    .map_or(1, BocaError::exit_code),
            );
        }
    }
}
