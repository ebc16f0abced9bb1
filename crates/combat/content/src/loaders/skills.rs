//! Skill catalog loader.

use std::path::Path;

use anyhow::Context;
use combat_core::SkillDefinition;

use crate::SkillCatalog;
use crate::loaders::{LoadResult, ensure_unique, read_file};

const EMBEDDED: &str = include_str!("../../data/skills.ron");

/// Loads skill definitions from a RON list.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<SkillCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<SkillCatalog> {
        let skills: Vec<SkillDefinition> =
            ron::from_str(content).context("failed to parse skill RON")?;
        ensure_unique(&skills, |s| s.id, "skill")?;
        if let Some(bad) = skills.iter().find(|s| s.hits == 0) {
            anyhow::bail!("skill {} ({}) declares zero hits", bad.id, bad.name);
        }
        Ok(skills.into_iter().collect())
    }

    /// The default skill set compiled into the crate.
    pub fn embedded() -> LoadResult<SkillCatalog> {
        Self::parse(EMBEDDED).context("embedded skills.ron")
    }
}
