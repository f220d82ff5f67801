//! Runtime configuration structures and loaders.
use std::env;
use std::time::Duration;

use autopilot_core::DEFAULT_TICK_PERIOD;

/// Runtime configuration shared across the context and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Fixed delay between two ticks.
    pub tick_period: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `AUTOPILOT_TICK_MS` - Tick period in milliseconds (default: 100)
    /// - `AUTOPILOT_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `AUTOPILOT_COMMAND_BUFFER` - Command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("AUTOPILOT_TICK_MS") {
            config.tick_period = Duration::from_millis(millis.max(1));
        }
        if let Some(capacity) = read_env::<usize>("AUTOPILOT_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("AUTOPILOT_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
