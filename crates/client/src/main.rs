//! Autopilot client binary.
//!
//! Loads configuration from the environment (and `.env`), installs logging,
//! then runs one agent session against the simulated world described by the
//! selected profile.
//!
//! # Examples
//!
//! ```bash
//! # Built-in rat cave profile for ten seconds
//! AUTOPILOT_RUN_SECS=10 cargo run -p autopilot-client
//!
//! # Custom profile with verbose policy logs
//! AUTOPILOT_PROFILE=./my.ron RUST_LOG=autopilot=debug cargo run -p autopilot-client
//! ```

use anyhow::Result;

use autopilot_client::{AgentProfile, ClientConfig, logging, run_session};
use autopilot_runtime::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(&config)?;

    let profile = match &config.profile {
        Some(path) => {
            tracing::info!("Loading profile {}", path.display());
            AgentProfile::load(path)?
        }
        None => {
            tracing::info!("Using built-in profile");
            AgentProfile::builtin()?
        }
    };

    let runtime_config = RuntimeConfig::from_env();
    tracing::info!(
        tick_ms = runtime_config.tick_period.as_millis() as u64,
        run_secs = config.run_for.as_secs(),
        zones = profile.zones.len(),
        waypoints = profile.waypoints.len(),
        "Starting autopilot session"
    );

    let report = run_session(&profile, runtime_config, config.run_for).await?;
    tracing::info!("Session report: {}", serde_json::to_string(&report)?);

    Ok(())
}
