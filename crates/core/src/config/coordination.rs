// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination configuration
//!
//! Defaults for coalescing executors and the hold-tracking maintenance pass,
//! loadable from TOML.

use crate::coordination::maintenance::MaintenanceConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Default run options for a coalescing executor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Record a deferred request when the executor is already running
    pub coalesce_if_busy: bool,
    /// Keep invoking the action until no request is pending
    pub drain_while_pending: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            coalesce_if_busy: true,
            drain_while_pending: true,
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coalesce_if_busy(mut self, enabled: bool) -> Self {
        self.coalesce_if_busy = enabled;
        self
    }

    pub fn with_drain_while_pending(mut self, enabled: bool) -> Self {
        self.drain_while_pending = enabled;
        self
    }
}

/// Top-level configuration
///
/// ```toml
/// [executor]
/// coalesce_if_busy = true
/// drain_while_pending = false
///
/// [maintenance]
/// hold_threshold = "2m"
/// interval = "15s"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    pub executor: ExecutorConfig,
    pub maintenance: MaintenanceConfig,
}

impl CoordinationConfig {
    /// Parse from TOML; missing tables and fields keep their defaults
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

#[cfg(test)]
#[path = "coordination_tests.rs"]
mod tests;
