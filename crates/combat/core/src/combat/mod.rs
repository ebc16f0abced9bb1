//! Combat math and the action resolution pipeline.
//!
//! Pure functions over battler snapshots: level scaling, critical
//! amplification, elemental resolution and formula evaluation compose inside
//! [`pipeline::resolve`] in a fixed stage order.
mod critical;
mod element;
mod formula;
mod level;
pub mod pipeline;
mod result;

pub use critical::critical_multiplier;
pub use element::{ElementId, ElementSet, ElementalOutcome, resolve_elemental};
pub use formula::{Formula, evaluate};
pub use level::{damage_multiplier, level_multiplier, reward_multiplier};
pub use pipeline::{ActionRequest, ResolveStage, check_readiness, resolve};
pub use result::{AppliedEffect, CombatResult, HitRecord, RemovedEffect};
