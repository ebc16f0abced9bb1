//! Error infrastructure for combat resolution.
//!
//! Every failure the pipeline or scheduler can produce is a [`CombatError`].
//! None of them halt the tick loop: a rejected action is dropped and reported,
//! a malformed effect is applied with safe defaults and reported, and a
//! corrupt battler is suspended on its own while the rest keep running.

use crate::combat::ResolveStage;
use crate::state::{BattlerId, EffectId, SkillId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: expected during normal play, the caller may retry later
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: data-authoring or state inconsistency worth investigating
/// - **Fatal**: state corrupted, the affected battler cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common classification interface for combat errors.
///
/// Telemetry keys its counters on [`CombatFault::error_code`], so codes are
/// stable identifiers rather than display text.
pub trait CombatFault: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while validating or resolving combat actions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// The skill id is absent from the catalog.
    #[error("skill {skill} is not in the skill catalog")]
    InvalidSkillReference { skill: SkillId },

    /// The caster cannot pay the skill's cost.
    #[error("battler {battler} cannot pay for skill {skill} ({hp} hp / {mp} mp required)")]
    InsufficientResource {
        battler: BattlerId,
        skill: SkillId,
        hp: u32,
        mp: u32,
    },

    /// The slot holding the skill is cooling down.
    #[error("slot holding skill {skill} on battler {battler} is not ready")]
    SlotNotReady { battler: BattlerId, skill: SkillId },

    /// No slot on the caster holds the skill.
    #[error("battler {battler} has no slot bound to skill {skill}")]
    SkillNotBound { battler: BattlerId, skill: SkillId },

    /// The caster is missing or defeated.
    #[error("caster {battler} is missing or defeated")]
    CasterInvalid { battler: BattlerId },

    /// The caster holds an effect that prevents acting.
    #[error("caster {battler} is incapacitated")]
    CasterIncapacitated { battler: BattlerId },

    /// The target is missing or defeated.
    #[error("target {battler} is missing or defeated")]
    TargetInvalid { battler: BattlerId },

    /// An effect definition is missing data; safe defaults were substituted.
    #[error("effect {effect} is malformed: {reason}")]
    MalformedEffectDefinition { effect: EffectId, reason: &'static str },

    /// A battler with this id already takes part in the encounter.
    #[error("battler {battler} is already part of the encounter")]
    DuplicateBattler { battler: BattlerId },

    /// A battler's state violates an invariant and cannot be processed.
    #[error("battler {battler} has corrupt state: {reason}")]
    CorruptState {
        battler: BattlerId,
        reason: &'static str,
    },
}

impl CombatFault for CombatError {
    fn severity(&self) -> ErrorSeverity {
        use CombatError::*;
        match self {
            SlotNotReady { .. } | InsufficientResource { .. } | CasterIncapacitated { .. } => {
                ErrorSeverity::Recoverable
            }
            InvalidSkillReference { .. }
            | SkillNotBound { .. }
            | CasterInvalid { .. }
            | TargetInvalid { .. }
            | DuplicateBattler { .. } => ErrorSeverity::Validation,
            MalformedEffectDefinition { .. } => ErrorSeverity::Internal,
            CorruptState { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            InvalidSkillReference { .. } => "COMBAT_INVALID_SKILL_REFERENCE",
            InsufficientResource { .. } => "COMBAT_INSUFFICIENT_RESOURCE",
            SlotNotReady { .. } => "COMBAT_SLOT_NOT_READY",
            SkillNotBound { .. } => "COMBAT_SKILL_NOT_BOUND",
            CasterInvalid { .. } => "COMBAT_CASTER_INVALID",
            CasterIncapacitated { .. } => "COMBAT_CASTER_INCAPACITATED",
            TargetInvalid { .. } => "COMBAT_TARGET_INVALID",
            MalformedEffectDefinition { .. } => "COMBAT_MALFORMED_EFFECT_DEFINITION",
            DuplicateBattler { .. } => "COMBAT_DUPLICATE_BATTLER",
            CorruptState { .. } => "COMBAT_CORRUPT_STATE",
        }
    }
}

/// Associates a pipeline stage with the error that stopped resolution there.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage rejected action: {error}")]
pub struct ResolveError {
    pub stage: ResolveStage,
    pub error: CombatError,
}

impl ResolveError {
    pub fn new(stage: ResolveStage, error: CombatError) -> Self {
        Self { stage, error }
    }
}

impl CombatFault for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
