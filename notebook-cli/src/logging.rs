//! Log subscriber setup
//!
//! Logs always go to stderr so that command output on stdout stays
//! machine-readable. `RUST_LOG` takes precedence over the verbosity flags.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level selected by the global verbosity flags
pub fn level_from_flags(quiet: bool, debug: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the global fmt subscriber
pub fn init_logging(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let result = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
