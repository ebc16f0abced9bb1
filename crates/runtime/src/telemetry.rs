//! Combat counters aggregated from the event stream.
//!
//! Tracks damage dealt and taken per battler, kills, and dropped actions
//! keyed by their stable error code.

use std::collections::BTreeMap;

use combat_core::{BattlerId, CombatEvent, CombatResult};

/// Running totals for one encounter.
///
/// Fed by [`Telemetry::record`] for every engine event the runtime
/// publishes; restoring a save-state does not reset it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Telemetry {
    damage_dealt: BTreeMap<BattlerId, u64>,
    damage_taken: BTreeMap<BattlerId, u64>,
    healing_done: BTreeMap<BattlerId, u64>,
    kills: BTreeMap<BattlerId, u32>,
    dropped: BTreeMap<&'static str, u64>,
    actions_resolved: u64,
    suspensions: u64,
    diagnostics: u64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::ActionResolved(result) => self.record_result(result),
            CombatEvent::ActionRejected(rejection) => {
                *self.dropped.entry(rejection.error_code()).or_default() += 1;
            }
            CombatEvent::BattlerDefeated { by, .. } => {
                *self.kills.entry(*by).or_default() += 1;
            }
            CombatEvent::BattlerSuspended { .. } => self.suspensions += 1,
            CombatEvent::Diagnostic(_) => self.diagnostics += 1,
            CombatEvent::EffectApplied { .. }
            | CombatEvent::EffectRemoved { .. }
            | CombatEvent::BattlerRemoved { .. } => {}
        }
    }

    fn record_result(&mut self, result: &CombatResult) {
        self.actions_resolved += 1;

        let damage = u64::from(result.damage_dealt());
        if damage > 0 {
            *self.damage_dealt.entry(result.caster).or_default() += damage;
            *self.damage_taken.entry(result.target).or_default() += damage;
        }

        let healing = u64::from(result.restored()) + result.drained.max(0).unsigned_abs();
        if healing > 0 {
            *self.healing_done.entry(result.caster).or_default() += healing;
        }
    }

    pub fn damage_dealt(&self, battler: BattlerId) -> u64 {
        self.damage_dealt.get(&battler).copied().unwrap_or(0)
    }

    pub fn damage_taken(&self, battler: BattlerId) -> u64 {
        self.damage_taken.get(&battler).copied().unwrap_or(0)
    }

    /// Restoration granted by the battler's actions, drain included.
    pub fn healing_done(&self, battler: BattlerId) -> u64 {
        self.healing_done.get(&battler).copied().unwrap_or(0)
    }

    pub fn kills(&self, battler: BattlerId) -> u32 {
        self.kills.get(&battler).copied().unwrap_or(0)
    }

    /// Dropped actions carrying `code` (see `CombatFault::error_code`).
    pub fn dropped(&self, code: &str) -> u64 {
        self.dropped.get(code).copied().unwrap_or(0)
    }

    pub fn dropped_total(&self) -> u64 {
        self.dropped.values().sum()
    }

    pub fn dropped_by_code(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.dropped.iter().map(|(code, count)| (*code, *count))
    }

    pub fn actions_resolved(&self) -> u64 {
        self.actions_resolved
    }

    pub fn suspensions(&self) -> u64 {
        self.suspensions
    }

    pub fn diagnostics(&self) -> u64 {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        ActionRequest, CombatError, Rejection, ResolveError, ResolveStage, SkillId,
    };

    fn rejected(error: CombatError) -> CombatEvent {
        CombatEvent::ActionRejected(Rejection {
            request: ActionRequest::base(BattlerId(1), BattlerId(2), SkillId(1)),
            error: ResolveError::new(ResolveStage::Lookup, error),
        })
    }

    #[test]
    fn rejections_are_counted_by_code() {
        let mut telemetry = Telemetry::new();
        telemetry.record(&rejected(CombatError::TargetInvalid {
            battler: BattlerId(2),
        }));
        telemetry.record(&rejected(CombatError::TargetInvalid {
            battler: BattlerId(3),
        }));
        telemetry.record(&rejected(CombatError::InvalidSkillReference {
            skill: SkillId(40),
        }));

        assert_eq!(telemetry.dropped("COMBAT_TARGET_INVALID"), 2);
        assert_eq!(telemetry.dropped("COMBAT_INVALID_SKILL_REFERENCE"), 1);
        assert_eq!(telemetry.dropped("COMBAT_SLOT_NOT_READY"), 0);
        assert_eq!(telemetry.dropped_total(), 3);
    }

    #[test]
    fn defeats_credit_the_killer() {
        let mut telemetry = Telemetry::new();
        telemetry.record(&CombatEvent::BattlerDefeated {
            battler: BattlerId(2),
            by: BattlerId(1),
            reward: Some(40),
        });
        assert_eq!(telemetry.kills(BattlerId(1)), 1);
        assert_eq!(telemetry.kills(BattlerId(2)), 0);
    }
}
