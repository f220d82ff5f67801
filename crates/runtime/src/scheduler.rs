//! Deferred re-invocation of the tick.
//!
//! Decision logic never sleeps. At the end of a tick it asks a [`Scheduler`]
//! to run the next one after a delay, and the host's timer facility (or a
//! test) decides when that happens. This keeps the agent runtime-agnostic and
//! lets tests drive ticks synchronously.
use std::time::Duration;

/// Capability to schedule the next tick.
pub trait Scheduler {
    /// Request one more tick after `delay`. Replaces any pending request.
    fn schedule_next(&mut self, delay: Duration);

    /// Drop any pending request.
    fn cancel(&mut self);
}

/// Scheduler that only records requests, for synchronous driving.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: Option<Duration>,
    requests: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay of the pending request, if any.
    pub fn pending(&self) -> Option<Duration> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending request, as a timer firing would.
    pub fn take(&mut self) -> Option<Duration> {
        self.pending.take()
    }

    /// Total number of `schedule_next` calls seen.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_next(&mut self, delay: Duration) {
        self.pending = Some(delay);
        self.requests += 1;
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_request_replaces_pending_one() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_next(Duration::ZERO);
        scheduler.schedule_next(Duration::from_millis(100));

        assert_eq!(scheduler.requests(), 2);
        assert_eq!(scheduler.take(), Some(Duration::from_millis(100)));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending_request() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_next(Duration::from_millis(100));
        scheduler.cancel();
        assert_eq!(scheduler.pending(), None);
    }
}
