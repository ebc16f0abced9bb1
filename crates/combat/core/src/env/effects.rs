use std::collections::HashMap;

use crate::state::{CombatModifiers, EffectId};

/// Oracle providing status effect definitions.
pub trait EffectOracle: Send + Sync {
    fn effect(&self, id: EffectId) -> Option<&EffectDefinition>;
}

impl EffectOracle for HashMap<EffectId, EffectDefinition> {
    fn effect(&self, id: EffectId) -> Option<&EffectDefinition> {
        self.get(&id)
    }
}

/// Length of a status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    Ticks(u32),
    /// Never runs out on its own.
    Indefinite,
}

impl EffectDuration {
    /// Sums two durations; anything indefinite stays indefinite.
    pub fn extended_by(self, other: Self) -> Self {
        match (self, other) {
            (Self::Ticks(a), Self::Ticks(b)) => Self::Ticks(a.saturating_add(b)),
            _ => Self::Indefinite,
        }
    }
}

/// Broad classification of an effect, deciding whether it may be cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectCategory {
    Buff,
    Debuff,
    #[default]
    Neutral,
    /// Stun, sleep and similar. Prevents acting; never auto-removed.
    Incapacitation,
    /// Death and other end states. Prevents acting; never auto-removed.
    Terminal,
}

impl EffectCategory {
    /// Whether duration/stack expiry may remove the effect.
    pub fn is_clearable(self) -> bool {
        !matches!(self, Self::Incapacitation | Self::Terminal)
    }

    pub fn prevents_action(self) -> bool {
        !self.is_clearable()
    }
}

/// What happens when an already-active effect is applied again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReapplyPolicy {
    /// Reset remaining duration to the base duration.
    #[default]
    Refresh,
    /// Add the new duration to the remaining one.
    Extend,
    /// Add a stack (up to the cap) and reset the duration.
    Stack,
}

/// Data-layer definition of a status effect.
///
/// `category` and `duration` are optional so that incomplete content still
/// loads; the ledger substitutes safe defaults and reports a diagnostic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub id: EffectId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<EffectCategory>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<EffectDuration>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reapply: ReapplyPolicy,
    /// Overrides the configured stack cap.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: Option<u8>,
    /// Modifiers contributed while the effect is active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: CombatModifiers,
}

impl EffectDefinition {
    pub fn new(id: EffectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
            duration: None,
            reapply: ReapplyPolicy::Refresh,
            max_stacks: None,
            modifiers: CombatModifiers::default(),
        }
    }

    pub fn with_category(mut self, category: EffectCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_duration(mut self, duration: EffectDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_reapply(mut self, policy: ReapplyPolicy) -> Self {
        self.reapply = policy;
        self
    }

    pub fn with_max_stacks(mut self, max: u8) -> Self {
        self.max_stacks = Some(max);
        self
    }

    pub fn with_modifiers(mut self, modifiers: CombatModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
