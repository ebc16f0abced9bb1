//! Headless arena entry point.
mod arena;
mod config;

use std::path::Path;

use anyhow::{Context, Result};
use arena::Arena;
use config::ArenaConfig;
use runtime::Runtime;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ArenaConfig::from_env(std::env::args().skip(1));

    // Keeps the file writer flushing until main returns.
    let _guard = setup_logging(config.log_dir.as_deref())?;

    let mut runtime = Runtime::builder()
        .config(config.runtime())
        .build()
        .context("failed to start the encounter")?;
    tracing::info!(seed = runtime.seed(), ticks = config.ticks, "arena starting");

    let mut arena = Arena::setup(&mut runtime)?;
    let winner = arena.run(config.ticks);
    arena.print_summary(winner);

    tracing::info!(winner = ?winner, "arena finished");
    Ok(())
}

/// Setup logging to stderr and, when a directory is given, to `arena.log`.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, "arena.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/arena.log", dir.display());
    }
    Ok(guard)
}
