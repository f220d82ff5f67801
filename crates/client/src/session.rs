//! One bounded autopilot session against the simulated world.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use autopilot_runtime::{
    AgentEvent, AgentRuntime, AgentStatus, MetricsSnapshot, RunState, RuntimeConfig, Topic,
};

use crate::profile::AgentProfile;

/// What the session achieved, logged at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub final_state: RunState,
    pub metrics: MetricsSnapshot,
    pub creatures_alive: usize,
    pub world_steps: u64,
    pub health: u32,
}

/// Run the agent described by `profile` until `run_for` elapses, the agent
/// stops on its own, or Ctrl-C is pressed.
pub async fn run_session(
    profile: &AgentProfile,
    runtime_config: RuntimeConfig,
    run_for: Duration,
) -> Result<SessionReport> {
    let zones = profile.zone_registry();
    for zone in zones.zones() {
        info!(zone = zone.id.0, name = %zone.name, floor = zone.floor, "Authorized zone");
    }

    let runtime = AgentRuntime::builder(profile.simulated_host())
        .config(runtime_config)
        .zones(zones)
        .agent_config(profile.agent_config())
        .build();
    let handle = runtime.handle();

    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let loggers: Vec<_> = [Topic::Zone, Topic::Survival, Topic::Engagement, Topic::Itinerary]
        .into_iter()
        .map(|topic| tokio::spawn(log_events(topic, handle.subscribe(topic))))
        .collect();

    handle
        .start()
        .await
        .context("Agent refused to start; move the character into a registered zone")?;

    tokio::select! {
        _ = tokio::time::sleep(run_for) => info!("Session time elapsed"),
        reason = wait_for_stop(&mut lifecycle) => info!(?reason, "Agent stopped on its own"),
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    let status: AgentStatus = handle.status().await?;
    let host = runtime.shutdown().await?;
    for logger in loggers {
        logger.abort();
    }

    Ok(SessionReport {
        final_state: status.run_state,
        metrics: status.metrics,
        creatures_alive: host.creatures_alive(),
        world_steps: host.steps(),
        health: host.current_character().health,
    })
}

async fn wait_for_stop(lifecycle: &mut broadcast::Receiver<AgentEvent>) -> Option<AgentEvent> {
    loop {
        match lifecycle.recv().await {
            Ok(event @ AgentEvent::Stopped { .. }) => return Some(event),
            Ok(AgentEvent::TickSkipped { reason }) => warn!(%reason, "Tick skipped"),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "Lifecycle subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

async fn log_events(topic: Topic, mut rx: broadcast::Receiver<AgentEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => info!(target: "autopilot::events", ?topic, "{json}"),
                Err(error) => warn!(target: "autopilot::events", %error, "Unserializable event"),
            },
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(target: "autopilot::events", ?topic, missed, "Subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_builtin_profile_hunts_and_survives() {
        let profile = AgentProfile::builtin().unwrap();
        let report = run_session(&profile, RuntimeConfig::default(), Duration::from_secs(20))
            .await
            .unwrap();

        assert_eq!(report.final_state, RunState::Running);
        assert!(report.metrics.ticks >= 190);
        assert!(report.metrics.targets_acquired >= 1);
        assert!(report.metrics.waypoints_reached >= 1);
        assert!(report.health > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_outside_zones_fails() {
        let mut profile = AgentProfile::builtin().unwrap();
        profile.zones.clear();

        let error = run_session(&profile, RuntimeConfig::default(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("refused to start"));
    }
}
