//! Host configuration.
use std::path::PathBuf;

use combat_core::CombatConfig;
use serde::{Deserialize, Serialize};

/// Runtime configuration shared by the orchestrator and its event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Replaces the balance config shipped with the content when set.
    pub combat: Option<CombatConfig>,
    /// Encounter seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    /// Buffered events per topic before slow subscribers start lagging.
    pub event_capacity: usize,
    /// Directory holding `skills.ron`, `effects.ron` and `combat.toml`.
    /// Embedded content is used when absent.
    pub content_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = Some(combat);
        self
    }

    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = Some(dir.into());
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: None,
            seed: None,
            event_capacity: 256,
            content_dir: None,
        }
    }
}
