//! Combat configuration loader.

use std::path::Path;

use anyhow::Context;
use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED: &str = include_str!("../../data/combat.toml");

/// Loader for [`CombatConfig`] from TOML. Omitted keys keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content).context("failed to parse config TOML")?;
        if config.critical_base_multiplier < 1.0 {
            anyhow::bail!(
                "critical_base_multiplier must be at least 1.0, got {}",
                config.critical_base_multiplier
            );
        }
        Ok(config)
    }

    pub fn embedded() -> LoadResult<CombatConfig> {
        Self::parse(EMBEDDED).context("embedded combat.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EffectId;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("despawn_delay = 12\n").expect("parses");
        assert_eq!(config.despawn_delay, 12);
        assert_eq!(config.critical_base_multiplier, CombatConfig::DEFAULT_CRITICAL_BASE_MULTIPLIER);
        assert_eq!(config.death_effect, None);
    }

    #[test]
    fn embedded_config_names_death_effect() {
        let config = ConfigLoader::embedded().expect("embedded config");
        assert_eq!(config.death_effect, Some(EffectId(99)));
    }

    #[test]
    fn sub_unit_critical_multiplier_is_rejected() {
        assert!(ConfigLoader::parse("critical_base_multiplier = 0.5").is_err());
    }
}
