// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic maintenance for exclusion holds
//!
//! Guards release on drop, so a section held for a long time points at a guard
//! that was leaked or a holder that is stuck. The leak detector reports those.

use super::exclusion::{ExclusionRegistry, HeldSection};
use super::manager::Coordinator;
use super::try_lock::SectionLock;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the maintenance pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// How long a section may stay held before it is reported
    #[serde(with = "humantime_serde")]
    pub hold_threshold: Duration,
    /// How often the caller's scheduler should run the pass
    ///
    /// Advisory only: nothing here runs on a timer. Callers read it through
    /// [`LeakDetector::interval`] and drive [`LeakDetector::tick`] themselves.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Log a warning for each overdue hold
    pub emit_warnings: bool,
    /// Clear overdue holds; their guards then fail to release
    pub reclaim_stale: bool,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            hold_threshold: Duration::from_secs(60),
            interval: Duration::from_secs(30),
            emit_warnings: true,
            reclaim_stale: false,
        }
    }
}

impl MaintenanceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hold_threshold(mut self, threshold: Duration) -> Self {
        self.hold_threshold = threshold;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_emit_warnings(mut self, enabled: bool) -> Self {
        self.emit_warnings = enabled;
        self
    }

    pub fn with_reclaim_stale(mut self, enabled: bool) -> Self {
        self.reclaim_stale = enabled;
        self
    }
}

/// Reports sections held longer than the configured threshold
///
/// Concurrent ticks on the same detector do not queue up: a tick that finds
/// another one in progress skips and returns `None`.
#[derive(Clone, Debug)]
pub struct LeakDetector {
    config: MaintenanceConfig,
    running: SectionLock,
}

impl LeakDetector {
    pub fn new(config: MaintenanceConfig) -> Self {
        Self {
            config,
            running: SectionLock::default(),
        }
    }

    /// Run a single maintenance cycle
    pub fn tick(&self, registry: &ExclusionRegistry) -> Option<Vec<HeldSection>> {
        self.running.run_or_skip(|_| self.scan(registry))
    }

    fn scan(&self, registry: &ExclusionRegistry) -> Vec<HeldSection> {
        let overdue: Vec<HeldSection> = registry
            .held_sections()
            .into_iter()
            .filter(|held| held.held_for > self.config.hold_threshold)
            .collect();

        for held in &overdue {
            if self.config.emit_warnings {
                tracing::warn!(
                    section = %held.name,
                    guard = %held.holder,
                    held_secs = held.held_for.as_secs(),
                    "section held past threshold"
                );
            }
            if self.config.reclaim_stale {
                registry.force_release(&held.name);
            }
        }

        overdue
    }

    /// Suggested period between [`tick`](Self::tick) calls
    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    pub fn config(&self) -> &MaintenanceConfig {
        &self.config
    }
}

/// Snapshot of coordination state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoordinationStats {
    pub total_sections: usize,
    pub held_sections: usize,
    pub stale_sections: usize,
    pub executed_once: usize,
}

impl CoordinationStats {
    /// Collect statistics from a coordinator
    pub fn collect(coordinator: &Coordinator, hold_threshold: Duration) -> Self {
        let exclusion = coordinator.exclusion();
        let held = exclusion.held_sections();

        CoordinationStats {
            total_sections: exclusion.section_names().len(),
            held_sections: held.len(),
            stale_sections: held
                .iter()
                .filter(|h| h.held_for > hold_threshold)
                .count(),
            executed_once: coordinator.once().len(),
        }
    }
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;
