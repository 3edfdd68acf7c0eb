// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator owning the named registries
//!
//! Created once at startup and cloned into every thread that needs it, in
//! place of process-wide globals.

use super::coalesce::CoalescingExecutor;
use super::exclusion::{ExclusionGuard, ExclusionRegistry};
use super::maintenance::{CoordinationStats, LeakDetector};
use super::once::OnceRegistry;
use crate::clock::{Clock, SystemClock};
use crate::config::CoordinationConfig;
use crate::error::CoordinationError;

/// Owns one exclusion registry, one once-registry and their configuration
#[derive(Clone, Debug)]
pub struct Coordinator {
    exclusion: ExclusionRegistry,
    once: OnceRegistry,
    config: CoordinationConfig,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::with_config(CoordinationConfig::default(), SystemClock)
    }

    pub fn with_config(config: CoordinationConfig, clock: impl Clock) -> Self {
        Self {
            exclusion: ExclusionRegistry::with_clock(clock),
            once: OnceRegistry::new(),
            config,
        }
    }

    pub fn exclusion(&self) -> &ExclusionRegistry {
        &self.exclusion
    }

    pub fn once(&self) -> &OnceRegistry {
        &self.once
    }

    pub fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    // === Exclusion ===

    /// Mark a section as held; see [`ExclusionRegistry::acquire`]
    pub fn acquire(&self, name: impl Into<String>) -> ExclusionGuard {
        self.exclusion.acquire(name)
    }

    pub fn run_exclusive<R>(
        &self,
        name: impl Into<String>,
        f: impl FnOnce() -> R,
    ) -> Result<Option<R>, CoordinationError> {
        self.exclusion.run_exclusive(name, f)
    }

    // === Once ===

    pub fn try_mark_executed(&self, name: &str) -> bool {
        self.once.try_mark_executed(name)
    }

    pub fn reset_once(&self, name: &str) -> bool {
        self.once.reset(name)
    }

    // === Executors and maintenance ===

    /// Wrap `action` in an executor using the configured defaults
    pub fn executor<F: FnMut()>(&self, action: F) -> CoalescingExecutor<F> {
        CoalescingExecutor::new(action).with_config(self.config.executor)
    }

    pub fn leak_detector(&self) -> LeakDetector {
        LeakDetector::new(self.config.maintenance.clone())
    }

    pub fn stats(&self) -> CoordinationStats {
        CoordinationStats::collect(self, self.config.maintenance.hold_threshold)
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
