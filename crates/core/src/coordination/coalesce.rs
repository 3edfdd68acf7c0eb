// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coalescing executor for slow refresh actions
//!
//! Bursts of "please refresh" requests collapse into as few invocations of the
//! wrapped action as possible while the last request is still honoured. At most
//! one invocation runs at a time per executor; callers that find it running
//! record a request (or drop it) and return immediately.

use crate::config::ExecutorConfig;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Options for a single [`CoalescingExecutor::run_or_defer`] call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// When busy, record the request for the running invocation to pick up
    pub coalesce_if_busy: bool,
    /// Repeat the action until a pass starts with no pending request
    pub drain_while_pending: bool,
    /// Count this call as a request of its own, so the action runs even if
    /// nothing else was requested
    pub implicit_self_request: bool,
}

impl RunOptions {
    pub fn new(
        coalesce_if_busy: bool,
        drain_while_pending: bool,
        implicit_self_request: bool,
    ) -> Self {
        Self {
            coalesce_if_busy,
            drain_while_pending,
            implicit_self_request,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        ExecutorConfig::default().into()
    }
}

impl From<ExecutorConfig> for RunOptions {
    fn from(config: ExecutorConfig) -> Self {
        Self::new(config.coalesce_if_busy, config.drain_while_pending, true)
    }
}

/// What a [`CoalescingExecutor::run_or_defer`] call did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The action ran this many times
    Executed { invocations: usize },
    /// Took the executor but no request was pending
    Idle,
    /// Executor busy; the request was recorded for a later pass
    Deferred,
    /// Executor busy; the request was dropped
    Skipped,
}

impl RunOutcome {
    pub fn invocations(&self) -> usize {
        match self {
            RunOutcome::Executed { invocations } => *invocations,
            _ => 0,
        }
    }
}

/// Executor bound to one action
///
/// The action lives behind the executor's non-blocking lock, so it only ever
/// runs on one thread at a time and may be `FnMut`. Share the executor between
/// threads with an `Arc`.
pub struct CoalescingExecutor<F> {
    action: Mutex<F>,
    requests: AtomicUsize,
    invocations: AtomicU64,
    config: ExecutorConfig,
}

impl<F: FnMut()> CoalescingExecutor<F> {
    pub fn new(action: F) -> Self {
        Self {
            action: Mutex::new(action),
            requests: AtomicUsize::new(0),
            invocations: AtomicU64::new(0),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the options used by [`execute_or_request`](Self::execute_or_request)
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    /// Ask for the action to run eventually without running anything now
    pub fn request_execution(&self) {
        let pending = self.requests.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(pending, "execution requested");
    }

    /// Requests not yet consumed by an invocation
    pub fn pending_requests(&self) -> usize {
        self.requests.load(Ordering::Acquire)
    }

    /// Total invocations of the action so far
    pub fn invocation_count(&self) -> u64 {
        self.invocations.load(Ordering::Acquire)
    }

    /// Whether an invocation is in progress
    pub fn is_running(&self) -> bool {
        self.action.is_locked()
    }

    /// Run the action if the executor is free, otherwise defer or drop the request
    ///
    /// Never waits for a running invocation. A call made from inside the action
    /// itself finds the executor busy.
    pub fn run_or_defer(&self, options: RunOptions) -> RunOutcome {
        let mut counted = false;
        let mut action = match self.action.try_lock() {
            Some(action) => action,
            None if !options.coalesce_if_busy => {
                tracing::debug!("executor busy, request dropped");
                return RunOutcome::Skipped;
            }
            None => {
                self.request_execution();
                counted = true;
                // The running invocation may have finished its last pass before
                // the request landed; take one more look before leaving it.
                match self.action.try_lock() {
                    Some(action) => action,
                    None => {
                        tracing::debug!(
                            pending = self.pending_requests(),
                            "executor busy, request deferred"
                        );
                        return RunOutcome::Deferred;
                    }
                }
            }
        };

        if options.implicit_self_request && !counted {
            self.requests.fetch_add(1, Ordering::AcqRel);
        }

        let mut invocations = 0;
        loop {
            invocations += self.consume(&mut action, options.drain_while_pending);
            drop(action);

            // A request recorded after the last pass but before the unlock would
            // otherwise wait for the next caller.
            if !options.drain_while_pending || self.pending_requests() == 0 {
                break;
            }
            action = match self.action.try_lock() {
                Some(action) => action,
                None => break,
            };
        }

        if invocations == 0 {
            RunOutcome::Idle
        } else {
            tracing::debug!(invocations, "executor pass complete");
            RunOutcome::Executed { invocations }
        }
    }

    /// Run only if at least one request is outstanding
    pub fn execute_if_any_requested(
        &self,
        coalesce_if_busy: bool,
        drain_while_pending: bool,
    ) -> RunOutcome {
        self.run_or_defer(RunOptions::new(coalesce_if_busy, drain_while_pending, false))
    }

    /// Run now (or defer) using the executor's configured options
    pub fn execute_or_request(&self) -> RunOutcome {
        self.run_or_defer(self.config.into())
    }

    fn consume(&self, action: &mut MutexGuard<'_, F>, drain: bool) -> usize {
        let mut invocations = 0;
        while self.requests.swap(0, Ordering::AcqRel) > 0 {
            self.invoke(action);
            invocations += 1;
            if !drain {
                break;
            }
        }
        invocations
    }

    fn invoke(&self, action: &mut MutexGuard<'_, F>) {
        let run = self.invocations.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(run, "invoking action");
        (**action)();
    }
}

impl<F> fmt::Debug for CoalescingExecutor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoalescingExecutor")
            .field("running", &self.action.is_locked())
            .field("pending", &self.requests.load(Ordering::Relaxed))
            .field("invocations", &self.invocations.load(Ordering::Relaxed))
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[path = "coalesce_tests.rs"]
mod tests;
