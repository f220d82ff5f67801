//! Agent worker that owns the [`AgentContext`] and the host.
//!
//! Receives commands from [`AgentHandle`](crate::AgentHandle), fires ticks
//! when the timer scheduled by the previous tick expires, and publishes the
//! events each step produced on the [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use autopilot_core::{
    EngagementMode, Host, PolicyFlags, Position, SurvivalConfig, Timestamp, WaypointAction,
    ZoneBounds, ZoneId,
};

use crate::api::{EventHandler, Result};
use crate::context::{AgentContext, AgentStatus, TickOutcome};
use crate::events::{EventBus, EventKind, HostSignal};
use crate::scheduler::Scheduler;

/// Commands that can be sent to the agent worker.
pub enum Command {
    Start {
        reply: oneshot::Sender<Result<()>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    HostSignal {
        signal: HostSignal,
        reply: oneshot::Sender<()>,
    },
    ConfigureSurvival {
        config: SurvivalConfig,
        reply: oneshot::Sender<()>,
    },
    ConfigureEngagement {
        mode: EngagementMode,
        whitelist: Vec<String>,
        reply: oneshot::Sender<()>,
    },
    AddWaypoint {
        position: Position,
        action: Option<WaypointAction>,
        reply: oneshot::Sender<usize>,
    },
    ClearWaypoints {
        reply: oneshot::Sender<()>,
    },
    SetPolicies {
        policies: PolicyFlags,
        reply: oneshot::Sender<()>,
    },
    RegisterZone {
        name: String,
        bounds: ZoneBounds,
        floor: u8,
        reply: oneshot::Sender<ZoneId>,
    },
    RegisterHandler {
        kind: EventKind,
        handler: Box<dyn EventHandler>,
        reply: oneshot::Sender<()>,
    },
    UnregisterHandler {
        kind: EventKind,
        reply: oneshot::Sender<bool>,
    },
    /// Query a read-only status summary.
    Status {
        reply: oneshot::Sender<AgentStatus>,
    },
    /// Stop the agent and end the worker loop, handing the host back.
    Shutdown,
}

/// Scheduler backed by a Tokio deadline.
#[derive(Debug, Default)]
pub(crate) struct TimerScheduler {
    deadline: Option<Instant>,
}

impl TimerScheduler {
    fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn fire(&mut self) {
        self.deadline = None;
    }
}

impl Scheduler for TimerScheduler {
    fn schedule_next(&mut self, delay: std::time::Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Background task that drives one agent.
pub struct AgentWorker<H> {
    context: AgentContext,
    host: H,
    scheduler: TimerScheduler,
    epoch: Instant,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl<H> AgentWorker<H>
where
    H: Host + Send + 'static,
{
    pub fn new(
        context: AgentContext,
        host: H,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            context,
            host,
            scheduler: TimerScheduler::default(),
            epoch: Instant::now(),
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Returns the host once the loop ends.
    pub async fn run(mut self) -> H {
        loop {
            let deadline = self.scheduler.deadline();

            tokio::select! {
                biased;

                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                () = wait_for(deadline) => {
                    self.scheduler.fire();
                    self.tick();
                }
            }

            self.publish_events();
        }

        self.context.stop(&mut self.scheduler);
        self.publish_events();
        info!(target: "autopilot::worker", "Agent worker exiting");
        self.host
    }

    fn tick(&mut self) {
        let now = Timestamp::from(self.epoch.elapsed());
        let outcome = self.context.tick(&mut self.host, &mut self.scheduler, now);
        if outcome != TickOutcome::Completed {
            debug!(target: "autopilot::worker", ?outcome, "Tick finished");
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { reply } => {
                let result = self.context.start(&mut self.host, &mut self.scheduler);
                let _ = reply.send(result);
            }
            Command::Stop { reply } => {
                self.context.stop(&mut self.scheduler);
                let _ = reply.send(());
            }
            Command::HostSignal { signal, reply } => {
                self.context.host_signal(signal, &mut self.scheduler);
                let _ = reply.send(());
            }
            Command::ConfigureSurvival { config, reply } => {
                self.context.configure_survival(config);
                let _ = reply.send(());
            }
            Command::ConfigureEngagement {
                mode,
                whitelist,
                reply,
            } => {
                self.context.configure_engagement(mode, whitelist);
                let _ = reply.send(());
            }
            Command::AddWaypoint {
                position,
                action,
                reply,
            } => {
                let count = self
                    .context
                    .add_waypoint(position.x, position.y, position.z, action);
                let _ = reply.send(count);
            }
            Command::ClearWaypoints { reply } => {
                self.context.clear_waypoints();
                let _ = reply.send(());
            }
            Command::SetPolicies { policies, reply } => {
                self.context.set_policies(policies);
                let _ = reply.send(());
            }
            Command::RegisterZone {
                name,
                bounds,
                floor,
                reply,
            } => {
                let id = self.context.register_zone(name, bounds, floor);
                let _ = reply.send(id);
            }
            Command::RegisterHandler {
                kind,
                handler,
                reply,
            } => {
                self.context.register_boxed_handler(kind, handler);
                let _ = reply.send(());
            }
            Command::UnregisterHandler { kind, reply } => {
                let removed = self.context.unregister_handler(kind);
                let _ = reply.send(removed);
            }
            Command::Status { reply } => {
                let _ = reply.send(self.context.status());
            }
            Command::Shutdown => {}
        }
    }

    fn publish_events(&mut self) {
        for event in self.context.drain_events() {
            self.event_bus.publish(event);
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
