//! Read-only data consumed by the combat rules.
//!
//! Skill and effect definitions come from the data layer through oracle
//! traits; the [`CombatEnv`] aggregate bundles them with the RNG and balance
//! config so the pipeline never reaches for globals.
mod effects;
mod rng;
mod skills;

pub use effects::{EffectCategory, EffectDefinition, EffectDuration, EffectOracle, ReapplyPolicy};
pub use rng::{FixedRolls, PcgRng, RngOracle, compute_seed};
pub use skills::{DamageKind, EffectChance, ResourceCost, SkillDefinition, SkillOracle};

use crate::config::CombatConfig;

/// Borrowed view of everything the pipeline reads but never writes.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    skills: &'a dyn SkillOracle,
    effects: &'a dyn EffectOracle,
    rng: &'a dyn RngOracle,
    config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        skills: &'a dyn SkillOracle,
        effects: &'a dyn EffectOracle,
        rng: &'a dyn RngOracle,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            skills,
            effects,
            rng,
            config,
        }
    }

    pub fn skills(&self) -> &'a dyn SkillOracle {
        self.skills
    }

    pub fn effects(&self) -> &'a dyn EffectOracle {
        self.effects
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }
}

impl std::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
