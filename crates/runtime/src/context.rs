//! Caller-owned home of one agent.
//!
//! [`AgentContext`] bundles configuration, the zone registry, handlers and
//! the per-run [`AgentState`]. Every control operation and every tick goes
//! through it explicitly, so several independent agents can coexist and
//! tests can drive ticks one by one.
//!
//! # Tick order
//!
//! ```text
//! read character snapshot ── unavailable ──→ skip tick, reschedule
//!        │
//! re-check authorization ── outside ──→ zoneLeft, clear state, stop
//!        │
//! scan for a target ── unavailable ──→ skip tick, reschedule
//!        │
//! survival → engagement → itinerary (each only if enabled)
//!        │
//! schedule next tick
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use autopilot_core::{
    ActionError, ActionSink, AgentAction, AgentConfig, AgentState, CharacterSnapshot,
    EngagementConfig, EngagementMode, EngagementOutcome, EntityId, EntitySnapshot, Host,
    ItineraryStep, PolicyFlags, Position, SurvivalConfig, SurvivalTrigger, Timestamp, Vital,
    Waypoint, WaypointAction, WorldError, ZoneBounds, ZoneId, ZoneRegistry, ZoneTracker,
    ZoneTransition, dispatch,
};

use crate::api::{AgentError, EventHandler, HandlerRegistry, Result};
use crate::events::{AgentEvent, EventKind, HostSignal, StopReason};
use crate::metrics::{AgentMetrics, MetricsSnapshot};
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RunState {
    Stopped,
    Running,
}

/// What a call to [`AgentContext::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The agent is stopped; nothing ran and nothing was scheduled.
    Idle,
    /// All enabled policies ran and the next tick was scheduled.
    Completed,
    /// World state was unavailable; the next tick was scheduled.
    Skipped,
    /// Authorization was lost; the agent stopped and nothing was scheduled.
    Halted,
}

/// Read-only summary for UIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStatus {
    pub run_state: RunState,
    pub zone: Option<ZoneId>,
    pub target: Option<EntityId>,
    /// 1-based index of the waypoint currently travelled to.
    pub waypoint_index: Option<usize>,
    pub waypoint_count: usize,
    pub policies: PolicyFlags,
    pub metrics: MetricsSnapshot,
}

pub struct AgentContext {
    config: AgentConfig,
    zones: ZoneRegistry,
    handlers: HandlerRegistry,
    policies: PolicyFlags,
    tick_period: Duration,
    tracker: ZoneTracker,
    state: Option<AgentState>,
    metrics: Arc<AgentMetrics>,
    outbox: Vec<AgentEvent>,
}

impl AgentContext {
    pub fn new(config: AgentConfig, zones: ZoneRegistry) -> Self {
        Self {
            config,
            zones,
            handlers: HandlerRegistry::new(),
            policies: PolicyFlags::default(),
            tick_period: autopilot_core::DEFAULT_TICK_PERIOD,
            tracker: ZoneTracker::new(),
            state: None,
            metrics: Arc::new(AgentMetrics::new()),
            outbox: Vec::new(),
        }
    }

    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<AgentMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn state(&self) -> Option<&AgentState> {
        self.state.as_ref()
    }

    pub fn metrics(&self) -> &Arc<AgentMetrics> {
        &self.metrics
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn policies(&self) -> PolicyFlags {
        self.policies
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    pub fn run_state(&self) -> RunState {
        if self.is_running() {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            run_state: self.run_state(),
            zone: self.tracker.current().map(|zone| zone.id),
            target: self.state.as_ref().and_then(AgentState::target),
            waypoint_index: self
                .state
                .as_ref()
                .filter(|_| !self.config.waypoints.is_empty())
                .map(AgentState::waypoint_index),
            waypoint_count: self.config.waypoints.len(),
            policies: self.policies,
            metrics: self.metrics.snapshot(),
        }
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<AgentEvent> {
        std::mem::take(&mut self.outbox)
    }

    // ========================================================================
    // Control surface
    // ========================================================================

    /// Start the agent if the character stands in an authorized zone.
    ///
    /// Starting an already running agent is a no-op.
    ///
    /// # Errors
    ///
    /// - [`AgentError::ZoneUnauthorized`] when the current position is outside
    ///   every zone; the agent stays stopped.
    /// - [`AgentError::WorldUnavailable`] when the character cannot be read.
    pub fn start<H>(&mut self, host: &mut H, scheduler: &mut dyn Scheduler) -> Result<()>
    where
        H: Host + ?Sized,
    {
        if self.is_running() {
            debug!(target: "autopilot::agent", "start() while running, ignoring");
            return Ok(());
        }

        let character = host.character()?;
        let Some(zone) = self.zones.is_authorized(&character.position).cloned() else {
            warn!(
                target: "autopilot::agent",
                position = %character.position,
                "Refusing to start outside authorized zones"
            );
            return Err(AgentError::ZoneUnauthorized {
                position: character.position,
            });
        };

        info!(
            target: "autopilot::agent",
            zone = %zone.name,
            position = %character.position,
            "Agent started"
        );

        self.state = Some(AgentState::new());
        self.tracker.reset();
        self.emit(AgentEvent::Started {
            zone: zone.id,
            position: character.position,
        });
        if let Some(ZoneTransition::Entered(entered)) = self.tracker.observe(Some(&zone)) {
            let actions = self.notify(AgentEvent::ZoneEntered { zone: entered });
            self.perform_all(host, actions);
        }

        scheduler.schedule_next(Duration::ZERO);
        Ok(())
    }

    /// Stop the agent and discard its state. Idempotent.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if !self.is_running() {
            return;
        }
        self.halt(StopReason::Requested, scheduler);
    }

    /// Cancellation reported by the host (death, logout).
    pub fn host_signal(&mut self, signal: HostSignal, scheduler: &mut dyn Scheduler) {
        if !self.is_running() {
            debug!(target: "autopilot::agent", ?signal, "Host signal while stopped, ignoring");
            return;
        }
        self.halt(signal.into(), scheduler);
    }

    pub fn configure_survival(&mut self, survival: SurvivalConfig) {
        debug!(
            target: "autopilot::agent",
            health_threshold = survival.health_threshold,
            mana_threshold = survival.mana_threshold,
            "Survival reconfigured"
        );
        self.config.survival = survival;
    }

    pub fn configure_engagement<I, S>(&mut self, mode: EngagementMode, whitelist: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.engagement = EngagementConfig::new(mode, whitelist);
        debug!(
            target: "autopilot::agent",
            %mode,
            whitelist = ?self.config.engagement.whitelist(),
            "Engagement reconfigured"
        );
    }

    /// Append a waypoint and return the new itinerary length.
    pub fn add_waypoint(&mut self, x: i32, y: i32, z: u8, action: Option<WaypointAction>) -> usize {
        let mut waypoint = Waypoint::new(Position::new(x, y, z));
        waypoint.action = action;
        self.config.waypoints.push(waypoint);
        self.config.waypoints.len()
    }

    /// Remove every waypoint; the cursor restarts at 1.
    pub fn clear_waypoints(&mut self) {
        self.config.waypoints.clear();
        if let Some(state) = self.state.as_mut() {
            state.itinerary.reset();
        }
    }

    pub fn set_policies(&mut self, policies: PolicyFlags) {
        self.policies = policies;
    }

    pub fn register_zone(&mut self, name: impl Into<String>, bounds: ZoneBounds, floor: u8) -> ZoneId {
        self.zones.register(name, bounds, floor)
    }

    /// Attach a handler to an event kind, replacing any previous one.
    pub fn register_handler(&mut self, kind: EventKind, handler: impl EventHandler + 'static) {
        self.handlers.register(kind, handler);
    }

    pub fn register_boxed_handler(&mut self, kind: EventKind, handler: Box<dyn EventHandler>) {
        self.handlers.register_boxed(kind, handler);
    }

    pub fn unregister_handler(&mut self, kind: EventKind) -> bool {
        self.handlers.unregister(kind)
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Run one decision cycle.
    ///
    /// Must be invoked only when the scheduler's pending request fires; the
    /// tick completes fully before scheduling the next one.
    pub fn tick<H>(&mut self, host: &mut H, scheduler: &mut dyn Scheduler, now: Timestamp) -> TickOutcome
    where
        H: Host + ?Sized,
    {
        let Some(mut state) = self.state.take() else {
            return TickOutcome::Idle;
        };
        self.metrics.record_tick();

        let character = match host.character() {
            Ok(character) => character,
            Err(error) => {
                self.state = Some(state);
                self.skip_tick(&error, scheduler);
                return TickOutcome::Skipped;
            }
        };

        let zone = self.zones.is_authorized(&character.position).cloned();

        // Every world read happens before the first action, so a failed scan
        // leaves the host and the run state untouched.
        let engagement = if zone.is_some() && self.policies.contains(PolicyFlags::ENGAGEMENT) {
            let mut policy = state.engagement.clone();
            match policy.tick(&character, &*host, &self.config.engagement) {
                Ok(outcome) => {
                    state.engagement = policy;
                    Some(outcome)
                }
                Err(error) => {
                    self.state = Some(state);
                    self.skip_tick(&error, scheduler);
                    return TickOutcome::Skipped;
                }
            }
        } else {
            None
        };

        let transition = self.tracker.observe(zone.as_ref());
        if zone.is_none() {
            warn!(
                target: "autopilot::agent",
                position = %character.position,
                "Character left authorized zones"
            );
            if let Some(ZoneTransition::Left(left)) = transition {
                let discarded = self.notify(AgentEvent::ZoneLeft { zone: left });
                if !discarded.is_empty() {
                    warn!(
                        target: "autopilot::agent",
                        count = discarded.len(),
                        "Dropping actions requested after cancellation"
                    );
                }
            }
            self.halt(StopReason::ZoneLeft, scheduler);
            return TickOutcome::Halted;
        }
        if let Some(ZoneTransition::Entered(entered)) = transition {
            let actions = self.notify(AgentEvent::ZoneEntered { zone: entered });
            self.perform_all(host, actions);
        }

        if self.policies.contains(PolicyFlags::SURVIVAL) {
            self.run_survival(&mut state, host, &character, now);
        }

        if let Some(EngagementOutcome::Acquired(entity)) = engagement {
            self.engage(host, entity);
        }

        if self.policies.contains(PolicyFlags::ITINERARY) {
            self.run_itinerary(&mut state, host, &character);
        }

        self.state = Some(state);
        scheduler.schedule_next(self.tick_period);
        TickOutcome::Completed
    }

    fn run_survival<H>(
        &mut self,
        state: &mut AgentState,
        host: &mut H,
        character: &CharacterSnapshot,
        now: Timestamp,
    ) where
        H: Host + ?Sized,
    {
        let triggers = state
            .survival
            .evaluate(character, &self.config.survival, now);

        for SurvivalTrigger { vital, percent } in triggers {
            info!(
                target: "autopilot::survival",
                vital = vital.as_ref(),
                percent,
                "Vital below threshold"
            );

            let (event, remedy) = match vital {
                Vital::Health => (
                    AgentEvent::HealthLow { percent },
                    self.config.survival.health_remedy.clone(),
                ),
                Vital::Mana => (
                    AgentEvent::ManaLow { percent },
                    self.config.survival.mana_remedy.clone(),
                ),
            };

            // An override handler fully replaces the default remedy.
            match self.emit(event) {
                Some(actions) => self.perform_all(host, actions),
                None => match remedy {
                    Some(remedy) => {
                        if self.perform(host, &remedy.to_action()) {
                            match vital {
                                Vital::Health => self.metrics.record_heal(),
                                Vital::Mana => self.metrics.record_mana_restore(),
                            }
                        }
                    }
                    None => debug!(
                        target: "autopilot::survival",
                        vital = vital.as_ref(),
                        "No remedy configured"
                    ),
                },
            }
        }
    }

    fn engage<H>(&mut self, host: &mut H, entity: EntitySnapshot)
    where
        H: Host + ?Sized,
    {
        info!(
            target: "autopilot::engagement",
            entity = %entity.id,
            name = %entity.name,
            mode = %self.config.engagement.mode,
            "Target acquired"
        );
        self.metrics.record_target_acquired();
        self.perform(host, &AgentAction::Attack(entity.id));
        let actions = self.notify(AgentEvent::TargetAcquired { target: entity });
        self.perform_all(host, actions);
    }

    fn run_itinerary<H>(&mut self, state: &mut AgentState, host: &mut H, character: &CharacterSnapshot)
    where
        H: Host + ?Sized,
    {
        match state
            .itinerary
            .tick(&self.config.waypoints, &character.position)
        {
            ItineraryStep::Empty => {}
            ItineraryStep::MoveTo(destination) => {
                self.perform(host, &AgentAction::MoveTo(destination));
            }
            ItineraryStep::Arrived { waypoint, index } => {
                info!(
                    target: "autopilot::itinerary",
                    index,
                    position = %waypoint.position,
                    "Waypoint reached"
                );
                self.metrics.record_waypoint_reached();
                let attached = waypoint.action.as_ref().map(AgentAction::from);
                let actions = self.notify(AgentEvent::WaypointReached { waypoint, index });
                self.perform_all(host, actions);
                if let Some(action) = attached {
                    self.perform(host, &action);
                }
            }
        }
    }

    fn skip_tick(&mut self, error: &WorldError, scheduler: &mut dyn Scheduler) {
        self.metrics.record_skipped_tick();
        debug!(target: "autopilot::agent", %error, "Skipping tick");
        self.emit(AgentEvent::TickSkipped {
            reason: error.to_string(),
        });
        scheduler.schedule_next(self.tick_period);
    }

    fn halt(&mut self, reason: StopReason, scheduler: &mut dyn Scheduler) {
        self.state = None;
        self.tracker.reset();
        scheduler.cancel();
        info!(target: "autopilot::agent", reason = reason.as_ref(), "Agent stopped");
        self.emit(AgentEvent::Stopped { reason });
    }

    /// Record an event and run its handler, if any.
    ///
    /// Returns `None` when no handler is registered for the event's kind.
    fn emit(&mut self, event: AgentEvent) -> Option<Vec<AgentAction>> {
        let actions = self.handlers.invoke(&event);
        self.outbox.push(event);
        actions
    }

    fn notify(&mut self, event: AgentEvent) -> Vec<AgentAction> {
        self.emit(event).unwrap_or_default()
    }

    fn perform<S>(&mut self, sink: &mut S, action: &AgentAction) -> bool
    where
        S: ActionSink + ?Sized,
    {
        match dispatch(sink, action) {
            Ok(()) => {
                debug!(target: "autopilot::agent", action = action.label(), "Action issued");
                true
            }
            Err(ActionError::ConsumableUnavailable { item }) => {
                info!(target: "autopilot::agent", %item, "Consumable unavailable");
                self.metrics.record_consumable_unavailable();
                self.emit(AgentEvent::ConsumableUnavailable { item });
                false
            }
            Err(error) => {
                warn!(
                    target: "autopilot::agent",
                    action = action.label(),
                    %error,
                    "Host rejected action"
                );
                false
            }
        }
    }

    fn perform_all<S>(&mut self, sink: &mut S, actions: Vec<AgentAction>)
    where
        S: ActionSink + ?Sized,
    {
        for action in &actions {
            self.perform(sink, action);
        }
    }
}
