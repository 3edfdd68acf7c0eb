// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination primitives for named code sections
//!
//! This module provides:
//! - **ExclusionRegistry** - Cooperative "is this section busy?" flags
//! - **OnceRegistry** - Run-once markers with explicit reset
//! - **SectionLock** - Non-blocking try-lock that skips instead of waiting
//! - **CoalescingExecutor** - Collapses bursts of refresh requests
//! - **Coordinator** - Owns the registries and their configuration

pub mod coalesce;
pub mod exclusion;
pub mod maintenance;
pub mod manager;
pub mod once;
pub mod try_lock;

pub use coalesce::{CoalescingExecutor, RunOptions, RunOutcome};
pub use exclusion::{ExclusionGuard, ExclusionRegistry, GuardId, HeldSection};
pub use maintenance::{CoordinationStats, LeakDetector, MaintenanceConfig};
pub use manager::Coordinator;
pub use once::OnceRegistry;
pub use try_lock::{SectionLock, TryLockToken};
