use crate::env::DamageKind;
use crate::error::CombatError;
use crate::state::{ApplyOutcome, BattlerId, EffectId, ResourceKind, SkillId};

/// Outcome of one hit of a multi-hit action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitRecord {
    /// Change applied to the target pool (negative = loss).
    pub delta: i64,
    pub critical: bool,
    pub parried: bool,
    pub blocked: bool,
}

/// A status effect applied during resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedEffect {
    pub battler: BattlerId,
    pub effect: EffectId,
    pub outcome: ApplyOutcome,
}

/// A status effect removed during resolution or by expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovedEffect {
    pub battler: BattlerId,
    pub effect: EffectId,
}

/// Structured outcome of one resolved action.
///
/// Carries everything the presentation and telemetry layers need, so nothing
/// downstream has to recompute rolls or scalars.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatResult {
    pub caster: BattlerId,
    pub target: BattlerId,
    /// Skill that actually executed (the follow-up for a combo).
    pub skill: SkillId,
    pub combo: bool,
    pub kind: DamageKind,
    pub resource: ResourceKind,
    /// Sum of computed per-hit amounts before clamping, signed like `applied`.
    pub raw: i64,
    /// Net change to the target pool after clamping.
    pub applied: i64,
    /// HP regained by the caster through drain.
    pub drained: i64,
    pub absorbed: bool,
    pub critical: bool,
    pub parried: bool,
    pub blocked: bool,
    pub level_scalar: f64,
    pub elemental_scalar: f64,
    pub hits: Vec<HitRecord>,
    pub applied_effects: Vec<AppliedEffect>,
    pub removed_effects: Vec<RemovedEffect>,
    /// Set when this action defeated the target.
    pub defeated: bool,
    /// Level-scaled reward for the killing blow.
    pub reward: Option<u32>,
    /// Data problems hit while resolving; the action still completed.
    pub diagnostics: Vec<CombatError>,
}

impl CombatResult {
    pub(crate) fn new(
        caster: BattlerId,
        target: BattlerId,
        skill: SkillId,
        combo: bool,
        kind: DamageKind,
    ) -> Self {
        Self {
            caster,
            target,
            skill,
            combo,
            kind,
            resource: if kind.targets_mp() {
                ResourceKind::Mp
            } else {
                ResourceKind::Hp
            },
            raw: 0,
            applied: 0,
            drained: 0,
            absorbed: false,
            critical: false,
            parried: false,
            blocked: false,
            level_scalar: 1.0,
            elemental_scalar: 1.0,
            hits: Vec::new(),
            applied_effects: Vec::new(),
            removed_effects: Vec::new(),
            defeated: false,
            reward: None,
            diagnostics: Vec::new(),
        }
    }

    /// Amount taken from the target's pool.
    pub fn damage_dealt(&self) -> u32 {
        u32::try_from(-self.applied.min(0)).unwrap_or(u32::MAX)
    }

    /// Amount restored to the target's pool.
    pub fn restored(&self) -> u32 {
        u32::try_from(self.applied.max(0)).unwrap_or(u32::MAX)
    }

    pub(crate) fn record_hit(&mut self, hit: HitRecord, raw: i64) {
        self.raw += raw;
        self.applied += hit.delta;
        self.critical |= hit.critical;
        self.parried |= hit.parried;
        self.blocked |= hit.blocked;
        self.hits.push(hit);
    }
}
