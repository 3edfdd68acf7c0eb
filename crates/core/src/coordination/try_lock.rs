// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Non-blocking try-lock that skips work instead of waiting
//!
//! ```
//! use baton_core::{SectionLock, TryLockToken};
//!
//! let lock = SectionLock::new(());
//! let token = TryLockToken::try_acquire(&lock);
//! if token.acquired() {
//!     // maintenance pass; a concurrent caller would skip instead of waiting
//! }
//! ```

use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::fmt;
use std::sync::Arc;

/// Shared lock handle; clones refer to the same lock
pub struct SectionLock<T = ()> {
    inner: Arc<Mutex<T>>,
}

impl<T> SectionLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    /// Attempt to take the lock without waiting
    pub fn try_acquire(&self) -> TryLockToken<T> {
        TryLockToken::try_acquire(self)
    }

    /// Run `f` with the lock held, or return `None` at once if it is busy
    pub fn run_or_skip<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.inner.try_lock()?;
        Some(f(&mut guard))
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

impl<T> Clone for SectionLock<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for SectionLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for SectionLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionLock")
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Outcome of one non-blocking acquisition attempt
///
/// Owns the lock when the attempt succeeded and releases it exactly once, on
/// [`release`](Self::release) or on drop. A failed attempt holds nothing.
#[must_use = "dropping the token releases the lock immediately"]
pub struct TryLockToken<T = ()> {
    guard: Option<ArcMutexGuard<RawMutex, T>>,
    acquired: bool,
}

impl<T> TryLockToken<T> {
    pub fn try_acquire(lock: &SectionLock<T>) -> Self {
        let guard = lock.inner.try_lock_arc();
        let acquired = guard.is_some();
        if !acquired {
            tracing::trace!("lock busy, skipping");
        }
        Self { guard, acquired }
    }

    /// Whether the attempt took the lock
    pub fn acquired(&self) -> bool {
        self.acquired
    }

    /// Whether the lock is still held by this token
    pub fn is_held(&self) -> bool {
        self.guard.is_some()
    }

    /// The protected value, while held
    pub fn get(&self) -> Option<&T> {
        self.guard.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.guard.as_deref_mut()
    }

    /// Release the lock if held; further calls do nothing
    pub fn release(&mut self) {
        self.guard.take();
    }
}

impl TryLockToken<()> {
    /// Acquire a fresh private lock, which always succeeds
    pub fn unshared() -> Self {
        Self::try_acquire(&SectionLock::new(()))
    }
}

impl<T> fmt::Debug for TryLockToken<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryLockToken")
            .field("acquired", &self.acquired)
            .field("held", &self.is_held())
            .finish()
    }
}

#[cfg(test)]
#[path = "try_lock_tests.rs"]
mod tests;
