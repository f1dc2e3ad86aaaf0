//! Logging setup for the pgls binary.
//!
//! Diagnostics always go to stderr; stdout carries only the rendered tree.

use crate::Result;
use tracing_subscriber::EnvFilter;

/// Maps the verbosity flags onto a maximum log level.
///
/// `quiet` wins over any verbosity. Without flags only warnings are shown,
/// since informational lines would interleave with the tree on a terminal.
pub const fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes structured logging based on verbosity level.
///
/// A `RUST_LOG` filter in the environment takes precedence over the flags.
///
/// # Example
/// ```rust,no_run
/// use pgls_core::logging::init_logging;
///
/// // Initialize at INFO level
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            crate::error::PglsError::configuration(format!("Failed to initialize logging: {e}"))
        })?;

    Ok(())
}
