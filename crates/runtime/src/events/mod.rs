//! Topic-based event bus for runtime events.
//!
//! Every tick report is split into events published on one of four topics,
//! so a consumer interested only in status changes never sees action results.

mod bus;

pub use bus::{EventBus, Topic};

use combat_core::{BattlerId, BattlerKind, CombatEvent, Tick};

/// Event published by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Something the combat engine reported during `tick`.
    Combat { tick: Tick, event: CombatEvent },
    /// A battler joined the encounter.
    BattlerSpawned {
        tick: Tick,
        battler: BattlerId,
        kind: BattlerKind,
    },
    /// The engine was replaced by a decoded save-state.
    StateRestored { tick: Tick, battlers: usize },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat { event, .. } => topic_of(event),
            Event::BattlerSpawned { .. } | Event::StateRestored { .. } => Topic::Lifecycle,
        }
    }

    pub fn tick(&self) -> Tick {
        match self {
            Event::Combat { tick, .. }
            | Event::BattlerSpawned { tick, .. }
            | Event::StateRestored { tick, .. } => *tick,
        }
    }

    /// The wrapped engine event, if any.
    pub fn combat(&self) -> Option<&CombatEvent> {
        match self {
            Event::Combat { event, .. } => Some(event),
            _ => None,
        }
    }
}

fn topic_of(event: &CombatEvent) -> Topic {
    match event {
        CombatEvent::ActionResolved(_) | CombatEvent::ActionRejected(_) => Topic::Combat,
        CombatEvent::EffectApplied { .. } | CombatEvent::EffectRemoved { .. } => Topic::Status,
        CombatEvent::BattlerDefeated { .. }
        | CombatEvent::BattlerRemoved { .. }
        | CombatEvent::BattlerSuspended { .. } => Topic::Lifecycle,
        CombatEvent::Diagnostic(_) => Topic::Diagnostics,
    }
}
