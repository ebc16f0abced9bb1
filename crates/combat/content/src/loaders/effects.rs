//! Status effect catalog loader.

use std::path::Path;

use anyhow::Context;
use combat_core::EffectDefinition;

use crate::EffectCatalog;
use crate::loaders::{LoadResult, ensure_unique, read_file};

const EMBEDDED: &str = include_str!("../../data/effects.ron");

/// Loads effect definitions from a RON list.
///
/// Definitions missing a category or duration still load; the engine
/// substitutes defaults and reports them when the effect is applied.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EffectCatalog> {
        let effects: Vec<EffectDefinition> =
            ron::from_str(content).context("failed to parse effect RON")?;
        ensure_unique(&effects, |e| e.id, "effect")?;
        Ok(effects.into_iter().collect())
    }

    pub fn embedded() -> LoadResult<EffectCatalog> {
        Self::parse(EMBEDDED).context("embedded effects.ron")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{EffectCategory, EffectDuration, EffectId, ReapplyPolicy};

    #[test]
    fn embedded_effects_parse() {
        let catalog = EffectLoader::embedded().expect("embedded effects");
        let poison = catalog.get(EffectId(1)).expect("poison");
        assert_eq!(poison.reapply, ReapplyPolicy::Stack);
        assert_eq!(poison.duration, Some(EffectDuration::Ticks(180)));

        let death = catalog.get(EffectId(99)).expect("death");
        assert_eq!(death.category, Some(EffectCategory::Terminal));
        assert_eq!(death.duration, Some(EffectDuration::Indefinite));
    }

    #[test]
    fn incomplete_definitions_still_load() {
        let catalog = EffectLoader::parse(r#"[(id: 5, name: "Sketch")]"#).expect("loads");
        let sketch = catalog.get(EffectId(5)).expect("present");
        assert_eq!(sketch.category, None);
        assert_eq!(sketch.duration, None);
    }
}
