// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! baton-core: named in-process coordination primitives
//!
//! This crate provides:
//! - Cooperative exclusion of named code sections
//! - Run-once markers with explicit reset
//! - Non-blocking try-locks that skip work instead of waiting
//! - A coalescing executor that collapses bursts of refresh requests

pub mod clock;
pub mod config;
pub mod coordination;
pub mod error;

#[cfg(test)]
mod test_support;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, CoordinationConfig, ExecutorConfig};
pub use coordination::{
    CoalescingExecutor, CoordinationStats, Coordinator, ExclusionGuard, ExclusionRegistry,
    HeldSection, LeakDetector, MaintenanceConfig, OnceRegistry, RunOptions, RunOutcome,
    SectionLock, TryLockToken,
};
pub use error::CoordinationError;
