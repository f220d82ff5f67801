//! High-level runtime orchestrator.
//!
//! The runtime owns the agent worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive an agent against a host.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use autopilot_core::{AgentConfig, Host, PolicyFlags, ZoneRegistry};

use crate::api::{AgentError, AgentHandle, EventHandler, HandlerRegistry, Result};
use crate::config::RuntimeConfig;
use crate::context::AgentContext;
use crate::events::{AgentEvent, EventBus, EventKind, Topic};
use crate::metrics::AgentMetrics;
use crate::workers::{AgentWorker, Command};

/// Runtime that drives one agent on a background task
///
/// [`AgentHandle`] provides a cloneable façade for clients.
pub struct AgentRuntime<H> {
    handle: AgentHandle,
    worker_handle: JoinHandle<H>,
}

impl<H> AgentRuntime<H>
where
    H: Host + Send + 'static,
{
    /// Create a new runtime builder around `host`
    pub fn builder(host: H) -> AgentRuntimeBuilder<H> {
        AgentRuntimeBuilder::new(host)
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> AgentHandle {
        self.handle.clone()
    }

    /// Subscribe to events from one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<AgentEvent> {
        self.handle.subscribe(topic)
    }

    /// Stop the agent, end the worker and hand the host back
    pub async fn shutdown(self) -> Result<H> {
        self.handle.shutdown().await;
        drop(self.handle);

        self.worker_handle.await.map_err(AgentError::WorkerJoin)
    }
}

/// Builder for [`AgentRuntime`] with flexible configuration.
pub struct AgentRuntimeBuilder<H> {
    config: RuntimeConfig,
    host: H,
    zones: ZoneRegistry,
    agent: AgentConfig,
    handlers: HandlerRegistry,
    policies: PolicyFlags,
}

impl<H> AgentRuntimeBuilder<H>
where
    H: Host + Send + 'static,
{
    fn new(host: H) -> Self {
        Self {
            config: RuntimeConfig::default(),
            host,
            zones: ZoneRegistry::new(),
            agent: AgentConfig::default(),
            handlers: HandlerRegistry::new(),
            policies: PolicyFlags::default(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the authorized zones
    pub fn zones(mut self, zones: ZoneRegistry) -> Self {
        self.zones = zones;
        self
    }

    /// Provide survival, engagement and itinerary settings
    pub fn agent_config(mut self, agent: AgentConfig) -> Self {
        self.agent = agent;
        self
    }

    /// Attach a handler before the worker starts
    pub fn handler(mut self, kind: EventKind, handler: impl EventHandler + 'static) -> Self {
        self.handlers.register(kind, handler);
        self
    }

    pub fn policies(mut self, policies: PolicyFlags) -> Self {
        self.policies = policies;
        self
    }

    /// Spawn the worker. Must be called from within a Tokio runtime.
    pub fn build(self) -> AgentRuntime<H> {
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let metrics = Arc::new(AgentMetrics::new());

        let mut context = AgentContext::new(self.agent, self.zones)
            .with_tick_period(self.config.tick_period)
            .with_metrics(Arc::clone(&metrics))
            .with_handlers(self.handlers);
        context.set_policies(self.policies);

        let handle = AgentHandle::new(command_tx, event_bus.clone(), metrics);
        let worker = AgentWorker::new(context, self.host, command_rx, event_bus);

        let worker_handle = tokio::spawn(worker.run());

        AgentRuntime {
            handle,
            worker_handle,
        }
    }
}
