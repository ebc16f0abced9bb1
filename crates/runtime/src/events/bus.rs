//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::Event;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Resolved and rejected actions
    Combat,
    /// Status effects applied, removed or expired
    Status,
    /// Spawns, defeats, despawns and suspensions
    Lifecycle,
    /// Data-authoring problems found while resolving
    Diagnostics,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::Combat,
        Topic::Status,
        Topic::Lifecycle,
        Topic::Diagnostics,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Every channel exists from construction on, so
/// publishing and subscribing never block and never fail.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL.map(|_| broadcast::channel(capacity).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Number of live receivers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{BattlerId, BattlerKind, CombatEvent, EffectId};
    use tokio::sync::broadcast::error::TryRecvError;

    fn spawned(battler: u32) -> Event {
        Event::BattlerSpawned {
            tick: 0,
            battler: BattlerId(battler),
            kind: BattlerKind::Enemy,
        }
    }

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut status = bus.subscribe(Topic::Status);

        bus.publish(spawned(1));
        bus.publish(Event::Combat {
            tick: 3,
            event: CombatEvent::EffectRemoved {
                battler: BattlerId(1),
                effect: EffectId(4),
                expired: true,
            },
        });

        assert_eq!(lifecycle.try_recv().ok(), Some(spawned(1)));
        assert!(matches!(lifecycle.try_recv(), Err(TryRecvError::Empty)));
        let removed = status.try_recv().ok();
        assert_eq!(removed.as_ref().map(Event::tick), Some(3));
        assert!(matches!(status.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(spawned(1));
        assert_eq!(bus.subscriber_count(Topic::Lifecycle), 0);
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::with_capacity(0);
        let mut rx = bus.clone().subscribe(Topic::Lifecycle);
        bus.publish(spawned(7));
        assert_eq!(rx.try_recv().ok(), Some(spawned(7)));
    }
}
