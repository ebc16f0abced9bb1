//! Status effect ledger for battlers.
//!
//! Effects count down in ticks. Stacks outlive durations: when the remaining
//! duration of a stacked effect reaches zero one stack is consumed and the
//! duration re-arms from its base, so an effect with `S` stacks is removed
//! only after `S` full duration cycles.
//!
//! Effects in a non-clearable category (incapacitation, terminal states)
//! are never removed by expiry; only an explicit [`StatusLedger::remove`]
//! clears them.

use crate::config::CombatConfig;
use crate::env::{EffectCategory, EffectDuration, EffectOracle, ReapplyPolicy};
use crate::error::CombatError;

use super::{BattlerId, EffectId};

/// Fully resolved parameters for applying one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectSpec {
    pub id: EffectId,
    pub category: EffectCategory,
    pub policy: ReapplyPolicy,
    pub duration: EffectDuration,
    pub max_stacks: u8,
}

impl EffectSpec {
    /// Resolves an effect id against the data layer.
    ///
    /// Missing or unusable data never prevents the effect from applying:
    /// defaults are substituted and each problem is returned as a
    /// [`CombatError::MalformedEffectDefinition`] diagnostic.
    pub fn resolve(
        id: EffectId,
        effects: &dyn EffectOracle,
        duration_override: Option<EffectDuration>,
        config: &CombatConfig,
    ) -> (Self, Vec<CombatError>) {
        let minimal = EffectDuration::Ticks(config.minimal_effect_duration.max(1));
        let mut diagnostics = Vec::new();
        let mut malformed = |reason| {
            diagnostics.push(CombatError::MalformedEffectDefinition { effect: id, reason })
        };

        let Some(def) = effects.effect(id) else {
            malformed("no definition in the effect catalog");
            let spec = Self {
                id,
                category: EffectCategory::Neutral,
                policy: ReapplyPolicy::Refresh,
                duration: duration_override.unwrap_or(minimal),
                max_stacks: config.default_max_stacks,
            };
            return (spec, diagnostics);
        };

        let category = def.category.unwrap_or_else(|| {
            malformed("missing category");
            EffectCategory::Neutral
        });

        let duration = match duration_override.or(def.duration) {
            Some(EffectDuration::Ticks(0)) => {
                malformed("zero duration");
                minimal
            }
            Some(duration) => duration,
            None => {
                malformed("missing duration");
                minimal
            }
        };

        let spec = Self {
            id,
            category,
            policy: def.reapply,
            duration,
            max_stacks: def.max_stacks.unwrap_or(config.default_max_stacks).max(1),
        };
        (spec, diagnostics)
    }
}

/// How an [`StatusLedger::apply`] call changed the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Refreshed,
    Extended,
    /// Stack count after applying.
    Stacked(u8),
}

/// One active effect on a battler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub effect: EffectId,
    /// Battler that applied the effect most recently (may be the holder).
    pub source: BattlerId,
    pub category: EffectCategory,
    pub policy: ReapplyPolicy,
    pub remaining: EffectDuration,
    pub base_duration: EffectDuration,
    pub stacks: u8,
    pub max_stacks: u8,
    /// Suppresses duplicate apply cues while positive.
    pub recently_applied: u32,
    pub expired: bool,
}

impl StatusEffectInstance {
    fn new(spec: &EffectSpec, source: BattlerId, recently_applied: u32) -> Self {
        Self {
            effect: spec.id,
            source,
            category: spec.category,
            policy: spec.policy,
            remaining: spec.duration,
            base_duration: spec.duration,
            stacks: 1,
            max_stacks: spec.max_stacks,
            recently_applied,
            expired: false,
        }
    }

    /// Presentation cue: remaining time is within a fifth of the base.
    pub fn is_about_to_expire(&self) -> bool {
        match (self.remaining, self.base_duration) {
            (EffectDuration::Ticks(remaining), EffectDuration::Ticks(base)) => {
                remaining <= base.saturating_add(2) / 5
            }
            _ => false,
        }
    }

    /// Advances one tick. Returns true once the instance should be dropped.
    fn advance(&mut self) -> bool {
        self.recently_applied = self.recently_applied.saturating_sub(1);

        let EffectDuration::Ticks(remaining) = self.remaining else {
            return false;
        };
        let remaining = remaining.saturating_sub(1);
        self.remaining = EffectDuration::Ticks(remaining);

        if remaining == 0 && self.stacks > 0 {
            self.stacks -= 1;
            if self.stacks > 0 {
                self.remaining = self.base_duration;
            }
        }

        let exhausted = self.remaining == EffectDuration::Ticks(0) && self.stacks == 0;
        if exhausted && self.category.is_clearable() {
            self.expired = true;
        }
        self.expired
    }
}

/// Active effects owned by one battler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    effects: Vec<StatusEffectInstance>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an effect, creating it or following its reapply policy.
    pub fn apply(
        &mut self,
        spec: &EffectSpec,
        source: BattlerId,
        recently_applied: u32,
    ) -> ApplyOutcome {
        let Some(existing) = self.effects.iter_mut().find(|e| e.effect == spec.id) else {
            self.effects
                .push(StatusEffectInstance::new(spec, source, recently_applied));
            return ApplyOutcome::Applied;
        };

        existing.source = source;
        existing.recently_applied = recently_applied;
        match existing.policy {
            ReapplyPolicy::Refresh => {
                existing.remaining = existing.base_duration;
                ApplyOutcome::Refreshed
            }
            ReapplyPolicy::Extend => {
                existing.remaining = existing.remaining.extended_by(spec.duration);
                ApplyOutcome::Extended
            }
            ReapplyPolicy::Stack => {
                existing.stacks = existing.stacks.saturating_add(1).min(existing.max_stacks);
                existing.remaining = existing.base_duration;
                ApplyOutcome::Stacked(existing.stacks)
            }
        }
    }

    /// Advances every effect by one tick and returns the ones that expired.
    pub fn advance_all(&mut self) -> Vec<StatusEffectInstance> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            if effect.advance() {
                expired.push(effect.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Explicit removal; clears any category, including terminal ones.
    pub fn remove(&mut self, effect: EffectId) -> Option<StatusEffectInstance> {
        let index = self.effects.iter().position(|e| e.effect == effect)?;
        let mut removed = self.effects.remove(index);
        removed.expired = true;
        Some(removed)
    }

    /// Removes every clearable effect (used when the holder is defeated).
    pub fn clear_clearable(&mut self) -> Vec<StatusEffectInstance> {
        let (cleared, kept) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|e| e.category.is_clearable());
        self.effects = kept;
        cleared
    }

    pub fn get(&self, effect: EffectId) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.effect == effect)
    }

    pub fn has(&self, effect: EffectId) -> bool {
        self.get(effect).is_some()
    }

    pub fn is_about_to_expire(&self, effect: EffectId) -> bool {
        self.get(effect)
            .is_some_and(StatusEffectInstance::is_about_to_expire)
    }

    /// True while any incapacitating or terminal effect is held.
    pub fn prevents_action(&self) -> bool {
        self.effects.iter().any(|e| e.category.prevents_action())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::env::EffectDefinition;

    const CASTER: BattlerId = BattlerId(1);

    fn spec(policy: ReapplyPolicy, duration: u32, category: EffectCategory) -> EffectSpec {
        EffectSpec {
            id: EffectId(10),
            category,
            policy,
            duration: EffectDuration::Ticks(duration),
            max_stacks: 5,
        }
    }

    fn tick(ledger: &mut StatusLedger, n: u32) -> usize {
        (0..n).map(|_| ledger.advance_all().len()).sum()
    }

    #[test]
    fn single_stack_expires_after_one_duration() {
        let mut ledger = StatusLedger::new();
        let s = spec(ReapplyPolicy::Refresh, 4, EffectCategory::Debuff);
        assert_eq!(ledger.apply(&s, CASTER, 2), ApplyOutcome::Applied);

        assert_eq!(tick(&mut ledger, 3), 0);
        let expired = ledger.advance_all();
        assert_eq!(expired.len(), 1);
        assert!(expired[0].expired);
        assert!(ledger.is_empty());
    }

    #[test]
    fn stacks_outlive_durations() {
        let mut ledger = StatusLedger::new();
        let s = spec(ReapplyPolicy::Stack, 3, EffectCategory::Debuff);
        ledger.apply(&s, CASTER, 0);
        ledger.apply(&s, CASTER, 0);
        assert_eq!(ledger.apply(&s, CASTER, 0), ApplyOutcome::Stacked(3));

        // Three stacks of three ticks: present through tick 8, gone at tick 9.
        assert_eq!(tick(&mut ledger, 8), 0);
        assert_eq!(ledger.get(EffectId(10)).unwrap().stacks, 1);
        assert_eq!(tick(&mut ledger, 1), 1);
    }

    #[test]
    fn stack_count_is_capped() {
        let mut ledger = StatusLedger::new();
        let mut s = spec(ReapplyPolicy::Stack, 3, EffectCategory::Buff);
        s.max_stacks = 2;
        for _ in 0..6 {
            ledger.apply(&s, CASTER, 0);
        }
        assert_eq!(ledger.get(EffectId(10)).unwrap().stacks, 2);
    }

    #[test]
    fn refresh_and_extend_leave_stacks_alone() {
        let mut ledger = StatusLedger::new();
        let refresh = spec(ReapplyPolicy::Refresh, 10, EffectCategory::Buff);
        ledger.apply(&refresh, CASTER, 4);
        tick(&mut ledger, 6);
        assert_eq!(ledger.get(EffectId(10)).unwrap().recently_applied, 0);
        assert_eq!(ledger.apply(&refresh, CASTER, 4), ApplyOutcome::Refreshed);
        let instance = ledger.get(EffectId(10)).unwrap();
        assert_eq!(instance.remaining, EffectDuration::Ticks(10));
        assert_eq!(instance.stacks, 1);
        assert_eq!(instance.recently_applied, 4);

        let mut ledger = StatusLedger::new();
        let extend = spec(ReapplyPolicy::Extend, 10, EffectCategory::Buff);
        ledger.apply(&extend, CASTER, 4);
        tick(&mut ledger, 6);
        assert_eq!(ledger.apply(&extend, CASTER, 4), ApplyOutcome::Extended);
        let instance = ledger.get(EffectId(10)).unwrap();
        assert_eq!(instance.remaining, EffectDuration::Ticks(14));
        assert_eq!(instance.stacks, 1);
        assert_eq!(instance.recently_applied, 4);
    }

    #[test]
    fn incapacitation_is_never_auto_removed() {
        let mut ledger = StatusLedger::new();
        let stun = spec(ReapplyPolicy::Refresh, 2, EffectCategory::Incapacitation);
        ledger.apply(&stun, CASTER, 0);
        assert_eq!(tick(&mut ledger, 20), 0);
        assert!(ledger.prevents_action());

        let removed = ledger.remove(EffectId(10)).unwrap();
        assert!(removed.expired);
        assert!(!ledger.prevents_action());
    }

    #[test]
    fn indefinite_effects_persist() {
        let mut ledger = StatusLedger::new();
        let mut s = spec(ReapplyPolicy::Refresh, 1, EffectCategory::Buff);
        s.duration = EffectDuration::Indefinite;
        ledger.apply(&s, CASTER, 3);
        assert_eq!(tick(&mut ledger, 100), 0);
        let instance = ledger.get(EffectId(10)).unwrap();
        assert_eq!(instance.recently_applied, 0);
        assert!(!ledger.is_about_to_expire(EffectId(10)));
    }

    #[test]
    fn about_to_expire_uses_a_fifth_of_base() {
        let mut ledger = StatusLedger::new();
        ledger.apply(&spec(ReapplyPolicy::Refresh, 12, EffectCategory::Buff), CASTER, 0);
        tick(&mut ledger, 9);
        assert!(!ledger.is_about_to_expire(EffectId(10)));
        tick(&mut ledger, 1);
        assert!(ledger.is_about_to_expire(EffectId(10)));
    }

    #[test]
    fn about_to_expire_handles_the_longest_duration() {
        let mut ledger = StatusLedger::new();
        ledger.apply(&spec(ReapplyPolicy::Refresh, u32::MAX, EffectCategory::Buff), CASTER, 0);
        assert!(!ledger.is_about_to_expire(EffectId(10)));
        tick(&mut ledger, 1);
        assert!(!ledger.is_about_to_expire(EffectId(10)));
    }

    #[test]
    fn clear_clearable_keeps_terminal_states() {
        let mut ledger = StatusLedger::new();
        let poison = spec(ReapplyPolicy::Refresh, 9, EffectCategory::Debuff);
        let mut death = spec(ReapplyPolicy::Refresh, 1, EffectCategory::Terminal);
        death.id = EffectId(1);
        ledger.apply(&poison, CASTER, 0);
        ledger.apply(&death, CASTER, 0);

        let cleared = ledger.clear_clearable();
        assert_eq!(cleared.len(), 1);
        assert!(ledger.has(EffectId(1)));
    }

    #[test]
    fn resolve_substitutes_defaults_and_reports() {
        let config = CombatConfig::default();
        let mut effects = HashMap::new();
        effects.insert(EffectId(3), EffectDefinition::new(EffectId(3), "half-written"));

        let (spec, diagnostics) = EffectSpec::resolve(EffectId(3), &effects, None, &config);
        assert_eq!(spec.category, EffectCategory::Neutral);
        assert_eq!(spec.duration, EffectDuration::Ticks(1));
        assert_eq!(diagnostics.len(), 2);

        let (spec, diagnostics) = EffectSpec::resolve(EffectId(99), &effects, None, &config);
        assert_eq!(spec.max_stacks, config.default_max_stacks);
        assert_eq!(diagnostics.len(), 1);
    }
}
