//! Deterministic real-time combat rules.
//!
//! `combat-core` owns the per-battler cooldown, skill slot and status effect
//! state machines, and the ordered damage/effect pipeline that resolves an
//! attempted action. Every tick flows through [`engine::CombatEngine`], which
//! advances timers before draining submitted actions in submission order.
//!
//! Read-only data (skill and effect definitions, RNG, balance config) is
//! supplied through the oracle traits bundled in [`env::CombatEnv`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use combat::{
    ActionRequest, AppliedEffect, CombatResult, ElementId, ElementSet, ElementalOutcome, Formula,
    HitRecord, RemovedEffect, ResolveStage, check_readiness, critical_multiplier,
    damage_multiplier, level_multiplier, resolve, resolve_elemental, reward_multiplier,
};
pub use config::CombatConfig;
pub use engine::{CombatEngine, CombatEvent, Rejection, TickReport};
pub use env::{
    CombatEnv, DamageKind, EffectCategory, EffectChance, EffectDefinition, EffectDuration,
    EffectOracle, FixedRolls, PcgRng, ReapplyPolicy, ResourceCost, RngOracle, SkillDefinition,
    SkillOracle, compute_seed,
};
pub use error::{CombatError, CombatFault, ErrorSeverity, ResolveError};
pub use state::{
    ApplyOutcome, Battler, BattlerId, BattlerKind, BindOutcome, CombatModifiers, CombatStats,
    Cooldown, EffectId, EffectSpec, ResourceKind, Roster, SkillId, SkillSlot, SkillSlotTable, SlotKey,
    SlotReadiness, StatKind, StatusEffectInstance, StatusLedger, TeamId, Tick,
};
