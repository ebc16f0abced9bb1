//! In-memory skill and effect catalogs.

use std::collections::HashMap;

use combat_core::{EffectDefinition, EffectId, EffectOracle, SkillDefinition, SkillId, SkillOracle};

/// Skill definitions keyed by id. Immutable once handed to the engine.
#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
    skills: HashMap<SkillId, SkillDefinition>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, returning the one it replaced.
    pub fn insert(&mut self, skill: SkillDefinition) -> Option<SkillDefinition> {
        self.skills.insert(skill.id, skill)
    }

    pub fn get(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }

    pub fn contains(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    /// Looks a skill up by display name.
    pub fn find(&self, name: &str) -> Option<&SkillDefinition> {
        self.skills.values().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl SkillOracle for SkillCatalog {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.get(id)
    }
}

impl FromIterator<SkillDefinition> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = SkillDefinition>>(iter: I) -> Self {
        Self {
            skills: iter.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

/// Status effect definitions keyed by id.
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    effects: HashMap<EffectId, EffectDefinition>,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, effect: EffectDefinition) -> Option<EffectDefinition> {
        self.effects.insert(effect.id, effect)
    }

    pub fn get(&self, id: EffectId) -> Option<&EffectDefinition> {
        self.effects.get(&id)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.effects.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl EffectOracle for EffectCatalog {
    fn effect(&self, id: EffectId) -> Option<&EffectDefinition> {
        self.get(id)
    }
}

impl FromIterator<EffectDefinition> for EffectCatalog {
    fn from_iter<I: IntoIterator<Item = EffectDefinition>>(iter: I) -> Self {
        Self {
            effects: iter.into_iter().map(|e| (e.id, e)).collect(),
        }
    }
}

/// Cross-references between the two catalogs that do not resolve.
///
/// Dangling references are not fatal (the engine substitutes defaults and
/// reports diagnostics at runtime) but are almost always authoring mistakes.
pub fn dangling_references(skills: &SkillCatalog, effects: &EffectCatalog) -> Vec<String> {
    let mut issues = Vec::new();
    let mut sorted: Vec<_> = skills.iter().collect();
    sorted.sort_by_key(|s| s.id);

    for skill in sorted {
        if let Some(next) = skill.follow_up.filter(|next| !skills.contains(*next)) {
            issues.push(format!(
                "skill {} ({}) chains into unknown skill {}",
                skill.id, skill.name, next
            ));
        }
        let referenced = skill
            .on_cast
            .iter()
            .chain(skill.on_hit.iter())
            .chain(skill.inflicts.iter())
            .map(|c| c.effect)
            .chain(skill.cures.iter().copied());
        for effect in referenced.filter(|e| !effects.contains(*e)) {
            issues.push(format!(
                "skill {} ({}) references unknown effect {}",
                skill.id, skill.name, effect
            ));
        }
    }
    issues
}
