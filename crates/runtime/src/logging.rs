//! `tracing` subscriber setup for embedders and tests.
//!
//! Binaries with richer needs (file appenders, several layers) build their
//! own subscriber; this helper covers the common stderr case.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_level` when the variable is unset or unparsable.
///
/// Returns false if a global subscriber was already installed, which makes
/// it safe to call from every test.
pub fn init(default_level: Level) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
