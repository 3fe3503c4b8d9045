#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging utilities for the compiler.
//!
//! Library crates emit `tracing` events; binaries call [`init`] once to install
//! a stderr (or file) subscriber.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log level.
pub const LOG_ENV_VAR: &str = "PROTOGEN_LOG";

/// Prints a trace message with module prefix.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(target: "protogen", "[{}] {}", module, msg);
}

/// Builds the filter used by [`init`]: `PROTOGEN_LOG` wins over `level`.
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (tests and
/// embedding harnesses commonly install their own) or the log file could not
/// be opened, in which case events fall back to whatever is active.
pub fn init(level: &str, file: Option<&Path>) -> bool {
    let filter = filter_for(level);
    match file {
        Some(path) => {
            let Ok(handle) = OpenOptions::new().create(true).append(true).open(path) else {
                return false;
            };
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(handle))
                .try_init()
                .is_ok()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}
