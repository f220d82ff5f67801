//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one autopilot session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// RON profile to load; the built-in profile is used when unset.
    pub profile: Option<PathBuf>,
    /// How long to let the agent run before shutting down.
    pub run_for: Duration,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            profile: None,
            run_for: Duration::from_secs(30),
            session_id: None,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `AUTOPILOT_PROFILE` - Path to a RON agent profile (default: built-in)
    /// - `AUTOPILOT_RUN_SECS` - Session length in seconds (default: 30)
    /// - `AUTOPILOT_SESSION_ID` - Session identifier for logs (default: auto-generated)
    /// - `AUTOPILOT_LOG_DIR` - Directory for log files (default: platform-specific)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.profile = env::var("AUTOPILOT_PROFILE").ok().map(PathBuf::from);

        if let Some(secs) = read_env::<u64>("AUTOPILOT_RUN_SECS") {
            config.run_for = Duration::from_secs(secs.max(1));
        }

        config.session_id = env::var("AUTOPILOT_SESSION_ID").ok();
        config.log_dir = env::var("AUTOPILOT_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
