use crate::combat::{ActionRequest, CombatResult};
use crate::error::{CombatError, CombatFault, ResolveError};
use crate::state::{ApplyOutcome, BattlerId, EffectId, Tick};

/// An action the scheduler refused, with the stage that refused it.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    pub request: ActionRequest,
    pub error: ResolveError,
}

impl Rejection {
    /// Readiness misses are routine; everything else is worth reporting.
    pub fn is_routine(&self) -> bool {
        matches!(self.error.error, CombatError::SlotNotReady { .. })
    }

    pub fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}

/// Everything observable that happened during one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    ActionResolved(CombatResult),
    ActionRejected(Rejection),
    EffectApplied {
        battler: BattlerId,
        effect: EffectId,
        outcome: ApplyOutcome,
    },
    /// `expired` is false for cures, death clears and explicit removal.
    EffectRemoved {
        battler: BattlerId,
        effect: EffectId,
        expired: bool,
    },
    BattlerDefeated {
        battler: BattlerId,
        by: BattlerId,
        reward: Option<u32>,
    },
    BattlerRemoved {
        battler: BattlerId,
    },
    /// Integrity check failed; the battler is skipped from now on.
    BattlerSuspended {
        battler: BattlerId,
        error: CombatError,
    },
    /// Data-authoring problem surfaced while resolving.
    Diagnostic(CombatError),
}

/// Events of one tick, in the order they happened.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    pub events: Vec<CombatEvent>,
}

impl TickReport {
    pub(crate) fn new(tick: Tick) -> Self {
        Self {
            tick,
            events: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Expands a resolved action into its result plus the status, lifecycle
    /// and diagnostic notifications it implies.
    pub(crate) fn record_result(&mut self, result: CombatResult) {
        for applied in &result.applied_effects {
            self.events.push(CombatEvent::EffectApplied {
                battler: applied.battler,
                effect: applied.effect,
                outcome: applied.outcome,
            });
        }
        for removed in &result.removed_effects {
            self.events.push(CombatEvent::EffectRemoved {
                battler: removed.battler,
                effect: removed.effect,
                expired: false,
            });
        }
        for diagnostic in &result.diagnostics {
            self.events.push(CombatEvent::Diagnostic(diagnostic.clone()));
        }
        if result.defeated {
            self.events.push(CombatEvent::BattlerDefeated {
                battler: result.target,
                by: result.caster,
                reward: result.reward,
            });
        }
        self.events.push(CombatEvent::ActionResolved(result));
    }

    pub fn results(&self) -> impl Iterator<Item = &CombatResult> {
        self.events.iter().filter_map(|e| match e {
            CombatEvent::ActionResolved(result) => Some(result),
            _ => None,
        })
    }

    pub fn rejections(&self) -> impl Iterator<Item = &Rejection> {
        self.events.iter().filter_map(|e| match e {
            CombatEvent::ActionRejected(rejection) => Some(rejection),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
