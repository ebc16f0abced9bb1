//! Arena configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use runtime::RuntimeConfig;

/// One minute of simulated time at 60 ticks per second.
const DEFAULT_TICKS: u64 = 3600;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    pub ticks: u64,
    pub seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
    pub content_dir: Option<PathBuf>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            seed: None,
            log_dir: None,
            content_dir: None,
        }
    }
}

impl ArenaConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_TICKS` - Ticks to simulate before calling a draw (default: 3600)
    /// - `ARENA_SEED` - Encounter seed (default: random)
    /// - `ARENA_LOG_DIR` - Directory for `arena.log` (default: stderr only)
    /// - `ARENA_CONTENT_DIR` - Directory with content overrides (default: embedded)
    ///
    /// A positional argument overrides `ARENA_CONTENT_DIR`.
    pub fn from_env(args: impl IntoIterator<Item = String>) -> Self {
        Self::from_lookup(|key| env::var(key).ok(), args)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(ticks) = parse(&lookup, "ARENA_TICKS") {
            config.ticks = ticks;
        }
        config.seed = parse(&lookup, "ARENA_SEED");
        config.log_dir = lookup("ARENA_LOG_DIR").map(PathBuf::from);
        config.content_dir = args
            .into_iter()
            .next()
            .or_else(|| lookup("ARENA_CONTENT_DIR"))
            .map(PathBuf::from);

        config
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            seed: self.seed,
            content_dir: self.content_dir.clone(),
            ..RuntimeConfig::default()
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
