//! Agent activity counters.
//!
//! Shared between the worker (writer) and any number of handles (readers).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters updated by the agent context as it ticks.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct AgentMetrics {
    ticks: AtomicU64,
    skipped_ticks: AtomicU64,
    /// Default health remedies the host accepted.
    heals: AtomicU64,
    /// Default mana remedies the host accepted.
    mana_restores: AtomicU64,
    targets_acquired: AtomicU64,
    waypoints_reached: AtomicU64,
    consumables_unavailable: AtomicU64,
}

/// Plain copy of [`AgentMetrics`] at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub heals: u64,
    pub mana_restores: u64,
    pub targets_acquired: u64,
    pub waypoints_reached: u64,
    pub consumables_unavailable: u64,
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_tick(&self) {
        self.skipped_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_heal(&self) {
        self.heals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mana_restore(&self) {
        self.mana_restores.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_target_acquired(&self) {
        self.targets_acquired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_waypoint_reached(&self) {
        self.waypoints_reached.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_consumable_unavailable(&self) {
        self.consumables_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn heals(&self) -> u64 {
        self.heals.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            skipped_ticks: self.skipped_ticks.load(Ordering::Relaxed),
            heals: self.heals.load(Ordering::Relaxed),
            mana_restores: self.mana_restores.load(Ordering::Relaxed),
            targets_acquired: self.targets_acquired.load(Ordering::Relaxed),
            waypoints_reached: self.waypoints_reached.load(Ordering::Relaxed),
            consumables_unavailable: self.consumables_unavailable.load(Ordering::Relaxed),
        }
    }
}
