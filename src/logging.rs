//! Logging configuration.
//!
//! Logs go to stderr so stdout carries only the progress report.
//! `RUST_LOG` takes precedence over the verbosity chosen on the command line.

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr with `default_level` unless `RUST_LOG` is set.
pub fn init_stderr_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
