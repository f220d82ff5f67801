//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::AgentEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Start, stop and skipped ticks
    Lifecycle,
    /// Zone entered / left
    Zone,
    /// Low vitals and remedy failures
    Survival,
    /// Target acquisition
    Engagement,
    /// Waypoint arrivals
    Itinerary,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Lifecycle,
        Topic::Zone,
        Topic::Survival,
        Topic::Engagement,
        Topic::Itinerary,
    ];
}

struct Channels {
    lifecycle: broadcast::Sender<AgentEvent>,
    zone: broadcast::Sender<AgentEvent>,
    survival: broadcast::Sender<AgentEvent>,
    engagement: broadcast::Sender<AgentEvent>,
    itinerary: broadcast::Sender<AgentEvent>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<AgentEvent> {
        match topic {
            Topic::Lifecycle => &self.lifecycle,
            Topic::Zone => &self.zone,
            Topic::Survival => &self.survival,
            Topic::Engagement => &self.engagement,
            Topic::Itinerary => &self.itinerary,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: events published while
/// a topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                lifecycle: broadcast::channel(capacity).0,
                zone: broadcast::channel(capacity).0,
                survival: broadcast::channel(capacity).0,
                engagement: broadcast::channel(capacity).0,
                itinerary: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: AgentEvent) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<AgentEvent> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<AgentEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::StopReason;

    #[test]
    fn test_events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut survival = bus.subscribe(Topic::Survival);

        bus.publish(AgentEvent::Stopped {
            reason: StopReason::Requested,
        });

        assert_eq!(
            lifecycle.try_recv().ok(),
            Some(AgentEvent::Stopped {
                reason: StopReason::Requested
            })
        );
        assert!(survival.try_recv().is_err());
    }

    #[test]
    fn test_publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(AgentEvent::HealthLow { percent: 12.0 });
        let receivers = bus.subscribe_multiple(&Topic::ALL);
        assert_eq!(receivers.len(), Topic::ALL.len());
    }
}
