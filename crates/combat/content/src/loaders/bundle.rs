//! Complete content set for one encounter host.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::catalog::{EffectCatalog, SkillCatalog, dangling_references};
use crate::loaders::{ConfigLoader, EffectLoader, LoadResult, SkillLoader};

/// File names looked up inside a content directory.
pub const SKILLS_FILE: &str = "skills.ron";
pub const EFFECTS_FILE: &str = "effects.ron";
pub const CONFIG_FILE: &str = "combat.toml";

/// Skills, effects and balance config loaded together.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub skills: SkillCatalog,
    pub effects: EffectCatalog,
    pub config: CombatConfig,
}

impl ContentBundle {
    /// The data set compiled into the crate.
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self {
            skills: SkillLoader::embedded()?,
            effects: EffectLoader::embedded()?,
            config: ConfigLoader::embedded()?,
        })
    }

    /// Loads every file present in `dir`; missing files fall back to the
    /// embedded data.
    pub fn load_dir(dir: &Path) -> LoadResult<Self> {
        let file = |name: &str| -> Option<PathBuf> {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };

        Ok(Self {
            skills: match file(SKILLS_FILE) {
                Some(path) => SkillLoader::load(&path)?,
                None => SkillLoader::embedded()?,
            },
            effects: match file(EFFECTS_FILE) {
                Some(path) => EffectLoader::load(&path)?,
                None => EffectLoader::embedded()?,
            },
            config: match file(CONFIG_FILE) {
                Some(path) => ConfigLoader::load(&path)?,
                None => ConfigLoader::embedded()?,
            },
        })
    }

    /// Authoring problems worth surfacing; none of them prevent play.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = dangling_references(&self.skills, &self.effects);
        if let Some(death) = self.config.death_effect.filter(|e| !self.effects.contains(*e)) {
            issues.push(format!("config death_effect {death} is not a known effect"));
        }
        let mut incomplete: Vec<_> = self
            .effects
            .iter()
            .filter(|e| e.category.is_none() || e.duration.is_none())
            .collect();
        incomplete.sort_by_key(|e| e.id);
        for effect in incomplete {
            issues.push(format!(
                "effect {} ({}) is missing its category or duration",
                effect.id, effect.name
            ));
        }
        issues
    }
}
