//! Log setup for the command line tool.
//!
//! `RUST_LOG` wins when set; otherwise `--quiet` selects errors only and each `-v` raises
//! the level from info to debug to trace. Logs go to stderr so the summary on stdout stays
//! machine-readable.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Calling it twice leaves the first one in place.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(determine_level(verbose, quiet).into())
        .from_env_lossy();

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %determine_level(verbose, quiet), "logging initialized");
    }
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
