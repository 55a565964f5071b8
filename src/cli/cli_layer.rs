// CLI layer - argument structs, configuration and the per-binary entry points.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::core::errors::HelperError;

#[path = "config/settings.rs"]
pub mod config;

#[path = "output/json_output.rs"]
pub mod output;

#[path = "commands/mod.rs"]
pub mod commands;

/// Logs go to stderr; stdout carries results. `RUST_LOG` overrides `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Report the outcome of a command and pick the process exit code.
pub fn finish(result: Result<(), HelperError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
