// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-once markers for named code sections

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Set of section names that have already run
///
/// Marking is a single test-and-insert under one lock, so concurrent callers for
/// the same name can never both be told to run. Clones share the same set.
#[derive(Clone, Debug, Default)]
pub struct OnceRegistry {
    executed: Arc<Mutex<HashSet<String>>>,
}

impl OnceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn executed(&self) -> MutexGuard<'_, HashSet<String>> {
        self.executed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns true exactly once per name until it is reset
    pub fn try_mark_executed(&self, name: &str) -> bool {
        let first = self.executed().insert(name.to_string());
        if first {
            tracing::debug!(section = %name, "marked executed");
        }
        first
    }

    /// Re-arm `name`; returns whether it had been marked
    pub fn reset(&self, name: &str) -> bool {
        let removed = self.executed().remove(name);
        if removed {
            tracing::debug!(section = %name, "once marker reset");
        }
        removed
    }

    pub fn has_executed(&self, name: &str) -> bool {
        self.executed().contains(name)
    }

    /// Run `f` if `name` has not run yet
    ///
    /// The name is marked before `f` runs; a panic in `f` leaves it marked.
    pub fn run_once<R>(&self, name: &str, f: impl FnOnce() -> R) -> Option<R> {
        self.try_mark_executed(name).then(f)
    }

    pub fn len(&self) -> usize {
        self.executed().len()
    }

    pub fn is_empty(&self) -> bool {
        self.executed().is_empty()
    }
}

#[cfg(test)]
#[path = "once_tests.rs"]
mod tests;
