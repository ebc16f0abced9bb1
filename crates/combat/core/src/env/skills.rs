use std::collections::HashMap;

use crate::combat::{ElementSet, Formula};
use crate::state::{EffectId, SkillId};

use super::EffectDuration;

/// Oracle providing skill definitions.
///
/// The catalog is immutable after load; implementations never need interior
/// mutability.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition>;
}

impl SkillOracle for HashMap<SkillId, SkillDefinition> {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.get(&id)
    }
}

/// Which resource a skill moves and in which direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageKind {
    #[default]
    HpDamage,
    MpDamage,
    HpRecover,
    MpRecover,
    /// HP damage; the caster regains the applied amount.
    HpDrain,
}

impl DamageKind {
    pub fn is_damage(self) -> bool {
        matches!(self, Self::HpDamage | Self::MpDamage | Self::HpDrain)
    }

    pub fn is_recovery(self) -> bool {
        !self.is_damage()
    }

    pub fn targets_mp(self) -> bool {
        matches!(self, Self::MpDamage | Self::MpRecover)
    }
}

/// Resources spent by the caster when a skill executes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResourceCost {
    pub hp: u32,
    pub mp: u32,
}

impl ResourceCost {
    pub const FREE: Self = Self { hp: 0, mp: 0 };
}

/// A status effect applied with a percent chance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectChance {
    pub effect: EffectId,
    /// 0..=100; values at or above 100 always apply.
    pub percent: u32,
    /// Overrides the effect's own duration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<EffectDuration>,
}

impl EffectChance {
    pub fn new(effect: EffectId, percent: u32) -> Self {
        Self {
            effect,
            percent,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: EffectDuration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Immutable skill data looked up by id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: ResourceCost,
    /// Base cooldown in ticks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    /// Combo window in ticks, armed when `follow_up` is set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub combo_window: u32,
    pub formula: Formula,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: DamageKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elements: ElementSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub follow_up: Option<SkillId>,
    #[cfg_attr(feature = "serde", serde(default = "default_hits"))]
    pub hits: u8,
    /// Whether target parry can negate a hit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parryable: bool,
    /// Added to the caster's critical chance (percent points).
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical_rate: i32,
    /// Replaces the configured base critical multiplier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical_multiplier: Option<f64>,
    /// Rolled once per execution against the caster.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_cast: Option<EffectChance>,
    /// Rolled once per landed hit against the caster.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hit: Option<EffectChance>,
    /// Rolled once per landed hit against the target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inflicts: Vec<EffectChance>,
    /// Removed from the target on the first landed hit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cures: Vec<EffectId>,
}

#[cfg(feature = "serde")]
fn default_hits() -> u8 {
    1
}

impl SkillDefinition {
    pub fn new(id: SkillId, name: impl Into<String>, formula: Formula) -> Self {
        Self {
            id,
            name: name.into(),
            cost: ResourceCost::FREE,
            cooldown: 0,
            combo_window: 0,
            formula,
            kind: DamageKind::HpDamage,
            elements: ElementSet::empty(),
            follow_up: None,
            hits: 1,
            parryable: false,
            critical_rate: 0,
            critical_multiplier: None,
            on_cast: None,
            on_hit: None,
            inflicts: Vec::new(),
            cures: Vec::new(),
        }
    }

    pub fn with_cost(mut self, hp: u32, mp: u32) -> Self {
        self.cost = ResourceCost { hp, mp };
        self
    }

    pub fn with_cooldown(mut self, ticks: u32) -> Self {
        self.cooldown = ticks;
        self
    }

    pub fn with_combo(mut self, follow_up: SkillId, window: u32) -> Self {
        self.follow_up = Some(follow_up);
        self.combo_window = window;
        self
    }

    pub fn with_kind(mut self, kind: DamageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_elements(mut self, elements: ElementSet) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_hits(mut self, hits: u8) -> Self {
        self.hits = hits.max(1);
        self
    }

    pub fn parryable(mut self) -> Self {
        self.parryable = true;
        self
    }

    pub fn with_critical(mut self, rate: i32, multiplier: Option<f64>) -> Self {
        self.critical_rate = rate;
        self.critical_multiplier = multiplier;
        self
    }

    pub fn with_on_cast(mut self, chance: EffectChance) -> Self {
        self.on_cast = Some(chance);
        self
    }

    pub fn with_on_hit(mut self, chance: EffectChance) -> Self {
        self.on_hit = Some(chance);
        self
    }

    pub fn with_inflict(mut self, chance: EffectChance) -> Self {
        self.inflicts.push(chance);
        self
    }

    pub fn with_cure(mut self, effect: EffectId) -> Self {
        self.cures.push(effect);
        self
    }

    /// Follow-up and window, if this skill opens a combo.
    pub fn combo(&self) -> Option<(SkillId, u32)> {
        self.follow_up.map(|next| (next, self.combo_window))
    }
}
