//! Combat tick scheduler.
//!
//! [`CombatEngine`] is the single entry point per simulation frame. Each
//! [`CombatEngine::tick`] runs, in order:
//!
//! 1. integrity checks (a failing battler is suspended, the rest continue)
//! 2. cooldown advancement for every active battler
//! 3. status ledger advancement for every active battler
//! 4. despawn countdowns for defeated enemies
//! 5. resolution of every submitted action, in submission order
//!
//! Cooldowns advance before effect durations, and all advancement finishes
//! before any action resolves, so actions always see this tick's state.

mod events;

pub use events::{CombatEvent, Rejection, TickReport};

use std::collections::VecDeque;

use crate::combat::{self, ActionRequest};
use crate::env::{CombatEnv, EffectDuration, compute_seed};
use crate::error::CombatError;
use crate::state::{
    ApplyOutcome, Battler, BattlerId, BindOutcome, EffectId, EffectSpec, Roster, SkillId,
    SlotKey, SlotReadiness, StatusEffectInstance, Tick,
};

/// Owns every battler of one encounter and the queue of submitted actions.
///
/// Created at encounter start and dropped at encounter end; there is no
/// global "current battle".
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEngine {
    roster: Roster,
    queue: VecDeque<ActionRequest>,
    tick: Tick,
    nonce: u64,
    seed: u64,
}

impl CombatEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Number of actions resolved or rejected so far.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn battler(&self, id: BattlerId) -> Option<&Battler> {
        self.roster.get(id)
    }

    /// Adds a battler to the encounter.
    pub fn spawn(&mut self, battler: Battler) -> Result<(), CombatError> {
        self.roster
            .insert(battler)
            .map_err(|b| CombatError::DuplicateBattler { battler: b.id })
    }

    /// Removes a battler immediately, dropping its queued actions.
    pub fn remove(&mut self, id: BattlerId) -> Option<Battler> {
        self.queue.retain(|r| r.caster != id);
        self.roster.remove(id)
    }

    /// Queues an action for resolution at the end of the next tick.
    pub fn submit(&mut self, request: ActionRequest) {
        self.queue.push_back(request);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn bind(
        &mut self,
        battler: BattlerId,
        key: SlotKey,
        skill: SkillId,
        locked: bool,
    ) -> Result<BindOutcome, CombatError> {
        Ok(self.battler_mut(battler)?.slots.bind(key, skill, locked))
    }

    pub fn unbind(&mut self, battler: BattlerId, key: SlotKey) -> Result<Option<SkillId>, CombatError> {
        Ok(self.battler_mut(battler)?.slots.unbind(key))
    }

    /// Freezes a slot's timers. Returns false if the slot does not exist.
    pub fn lock_slot(&mut self, battler: BattlerId, key: SlotKey) -> Result<bool, CombatError> {
        Ok(self.battler_mut(battler)?.slots.lock(key))
    }

    pub fn unlock_slot(&mut self, battler: BattlerId, key: SlotKey) -> Result<bool, CombatError> {
        Ok(self.battler_mut(battler)?.slots.unlock(key))
    }

    pub fn resolve_ready_slot(&self, battler: BattlerId, key: SlotKey) -> SlotReadiness {
        self.roster
            .get(battler)
            .map_or(SlotReadiness::NotReady, |b| b.slots.resolve_ready_slot(key))
    }

    pub fn is_any_action_ready(&self, battler: BattlerId, key: SlotKey) -> bool {
        self.roster
            .get(battler)
            .is_some_and(|b| b.slots.is_any_action_ready(key))
    }

    pub fn is_about_to_expire(&self, battler: BattlerId, effect: EffectId) -> bool {
        self.roster
            .get(battler)
            .is_some_and(|b| b.statuses.is_about_to_expire(effect))
    }

    /// Applies an effect from outside an action (scripted events, items).
    ///
    /// Returns the ledger outcome and any data diagnostics.
    pub fn apply_effect(
        &mut self,
        env: CombatEnv<'_>,
        target: BattlerId,
        effect: EffectId,
        source: BattlerId,
        duration: Option<EffectDuration>,
    ) -> Result<(ApplyOutcome, Vec<CombatError>), CombatError> {
        let config = env.config();
        let battler = self
            .roster
            .get_mut(target)
            .filter(|b| b.is_alive())
            .ok_or(CombatError::TargetInvalid { battler: target })?;
        let (spec, diagnostics) = EffectSpec::resolve(effect, env.effects(), duration, config);
        let outcome = battler
            .statuses
            .apply(&spec, source, config.recently_applied_ticks);
        Ok((outcome, diagnostics))
    }

    /// Explicit removal; the only way to clear incapacitation or terminal
    /// effects.
    pub fn remove_effect(
        &mut self,
        target: BattlerId,
        effect: EffectId,
    ) -> Option<StatusEffectInstance> {
        self.roster.get_mut(target)?.statuses.remove(effect)
    }

    /// Runs one simulation tick.
    pub fn tick(&mut self, env: CombatEnv<'_>) -> TickReport {
        self.tick += 1;
        let mut report = TickReport::new(self.tick);

        self.check_integrity(&mut report);
        self.advance(&mut report);
        self.despawn(&mut report);
        self.drain(env, &mut report);

        report
    }

    fn battler_mut(&mut self, id: BattlerId) -> Result<&mut Battler, CombatError> {
        self.roster
            .get_mut(id)
            .ok_or(CombatError::CasterInvalid { battler: id })
    }

    fn check_integrity(&mut self, report: &mut TickReport) {
        for battler in self.roster.iter_mut().filter(|b| !b.suspended) {
            if let Err(error) = battler.check_integrity() {
                battler.suspended = true;
                report.push(CombatEvent::BattlerSuspended {
                    battler: battler.id,
                    error,
                });
            }
        }
    }

    fn advance(&mut self, report: &mut TickReport) {
        for battler in self.roster.iter_mut().filter(|b| !b.suspended && !b.defeated) {
            battler.slots.advance_all();
        }
        for battler in self.roster.iter_mut().filter(|b| !b.suspended) {
            for expired in battler.statuses.advance_all() {
                report.push(CombatEvent::EffectRemoved {
                    battler: battler.id,
                    effect: expired.effect,
                    expired: true,
                });
            }
        }
    }

    fn despawn(&mut self, report: &mut TickReport) {
        let mut gone = Vec::new();
        for battler in self.roster.iter_mut() {
            if let Some(remaining) = battler.despawn_in.as_mut() {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    gone.push(battler.id);
                }
            }
        }
        for id in gone {
            self.remove(id);
            report.push(CombatEvent::BattlerRemoved { battler: id });
        }
    }

    fn drain(&mut self, env: CombatEnv<'_>, report: &mut TickReport) {
        while let Some(request) = self.queue.pop_front() {
            let seed = compute_seed(self.seed, self.nonce, request.caster.0, 0);
            self.nonce += 1;

            let outcome = combat::check_readiness(&self.roster, &request)
                .and_then(|()| combat::resolve(&mut self.roster, &request, env, seed));
            match outcome {
                Ok(result) => report.record_result(result),
                Err(error) => report.push(CombatEvent::ActionRejected(Rejection { request, error })),
            }
        }
    }
}
