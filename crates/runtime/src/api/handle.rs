//! Cloneable façade for issuing commands to the agent worker.
//!
//! [`AgentHandle`] hides channel plumbing and offers async helpers for the
//! control surface, plus topic-filtered event streams.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use autopilot_core::{
    EngagementMode, PolicyFlags, Position, SurvivalConfig, WaypointAction, ZoneBounds, ZoneId,
};

use super::errors::{AgentError, Result};
use super::handlers::EventHandler;
use crate::context::AgentStatus;
use crate::events::{AgentEvent, EventBus, EventKind, HostSignal, Topic};
use crate::metrics::{AgentMetrics, MetricsSnapshot};
use crate::workers::Command;

/// Client-facing handle to interact with a running agent.
#[derive(Clone)]
pub struct AgentHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    metrics: Arc<AgentMetrics>,
}

impl AgentHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        metrics: Arc<AgentMetrics>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            metrics,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| AgentError::CommandChannelClosed)?;

        reply_rx.await.map_err(AgentError::ReplyChannelClosed)
    }

    /// Start the agent. Fails with [`AgentError::ZoneUnauthorized`] outside
    /// every registered zone.
    pub async fn start(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await?
    }

    /// Stop the agent. Stopping a stopped agent is a no-op.
    pub async fn stop(&self) -> Result<()> {
        self.request(|reply| Command::Stop { reply }).await
    }

    /// Forward a death or logout notification from the host.
    pub async fn host_signal(&self, signal: HostSignal) -> Result<()> {
        self.request(|reply| Command::HostSignal { signal, reply })
            .await
    }

    pub async fn configure_survival(&self, config: SurvivalConfig) -> Result<()> {
        self.request(|reply| Command::ConfigureSurvival { config, reply })
            .await
    }

    pub async fn configure_engagement<I, S>(&self, mode: EngagementMode, whitelist: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let whitelist = whitelist.into_iter().map(Into::into).collect();
        self.request(|reply| Command::ConfigureEngagement {
            mode,
            whitelist,
            reply,
        })
        .await
    }

    /// Append a waypoint and return the new itinerary length.
    pub async fn add_waypoint(
        &self,
        x: i32,
        y: i32,
        z: u8,
        action: Option<WaypointAction>,
    ) -> Result<usize> {
        let position = Position::new(x, y, z);
        self.request(|reply| Command::AddWaypoint {
            position,
            action,
            reply,
        })
        .await
    }

    pub async fn clear_waypoints(&self) -> Result<()> {
        self.request(|reply| Command::ClearWaypoints { reply }).await
    }

    pub async fn set_policies(&self, policies: PolicyFlags) -> Result<()> {
        self.request(|reply| Command::SetPolicies { policies, reply })
            .await
    }

    pub async fn register_zone(
        &self,
        name: impl Into<String>,
        bounds: ZoneBounds,
        floor: u8,
    ) -> Result<ZoneId> {
        let name = name.into();
        self.request(|reply| Command::RegisterZone {
            name,
            bounds,
            floor,
            reply,
        })
        .await
    }

    /// Attach a handler, replacing any handler already registered for `kind`.
    pub async fn register_handler(
        &self,
        kind: EventKind,
        handler: impl EventHandler + 'static,
    ) -> Result<()> {
        let handler: Box<dyn EventHandler> = Box::new(handler);
        self.request(|reply| Command::RegisterHandler {
            kind,
            handler,
            reply,
        })
        .await
    }

    pub async fn unregister_handler(&self, kind: EventKind) -> Result<bool> {
        self.request(|reply| Command::UnregisterHandler { kind, reply })
            .await
    }

    pub async fn status(&self) -> Result<AgentStatus> {
        self.request(|reply| Command::Status { reply }).await
    }

    /// Counters read directly, without a round trip through the worker.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use autopilot_runtime::Topic;
    ///
    /// let mut survival = handle.subscribe(Topic::Survival);
    /// while let Ok(event) = survival.recv().await {
    ///     // React to low vitals
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<AgentEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<AgentEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub(crate) async fn shutdown(&self) {
        let _ = self.command_tx.send(Command::Shutdown).await;
    }
}
