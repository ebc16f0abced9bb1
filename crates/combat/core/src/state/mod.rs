//! Authoritative per-battler combat state.
//!
//! Every type here is plain data: a save-state serializer can capture and
//! restore it without recomputing hidden fields. Mutation goes through the
//! owning battler's methods or through the engine.
pub mod battler;
pub mod cooldown;
pub mod modifiers;
pub mod slots;
pub mod status;

use std::collections::BTreeMap;
use std::fmt;

pub use battler::{Battler, BattlerKind, CombatStats, ResourceKind, StatKind};
pub use cooldown::Cooldown;
pub use modifiers::CombatModifiers;
pub use slots::{BindOutcome, SkillSlot, SkillSlotTable, SlotKey, SlotReadiness};
pub use status::{ApplyOutcome, EffectSpec, StatusEffectInstance, StatusLedger};

/// Simulation tick counter.
pub type Tick = u64;

/// Unique identifier of a combat participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct BattlerId(pub u32);

impl fmt::Display for BattlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team membership; battlers on the same team are allies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TeamId(pub u8);

/// Catalog key of a skill definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SkillId(pub u32);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog key of a status effect definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct EffectId(pub u32);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every battler taking part in an encounter, ordered by id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    battlers: BTreeMap<BattlerId, Battler>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a battler, returning it back if the id is already taken.
    pub fn insert(&mut self, battler: Battler) -> Result<(), Battler> {
        if self.battlers.contains_key(&battler.id) {
            return Err(battler);
        }
        self.battlers.insert(battler.id, battler);
        Ok(())
    }

    pub fn remove(&mut self, id: BattlerId) -> Option<Battler> {
        self.battlers.remove(&id)
    }

    pub fn get(&self, id: BattlerId) -> Option<&Battler> {
        self.battlers.get(&id)
    }

    pub fn get_mut(&mut self, id: BattlerId) -> Option<&mut Battler> {
        self.battlers.get_mut(&id)
    }

    pub fn contains(&self, id: BattlerId) -> bool {
        self.battlers.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Battler> {
        self.battlers.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Battler> {
        self.battlers.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = BattlerId> + '_ {
        self.battlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.battlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battlers.is_empty()
    }
}
