// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative exclusion of named code sections
//!
//! A guard marks its section as held on creation and never blocks. The first
//! guard to claim a free section becomes its holder; any guard created while the
//! section is held reports `is_free() == false` and is expected to skip the
//! protected work:
//!
//! ```
//! use baton_core::ExclusionRegistry;
//!
//! let registry = ExclusionRegistry::new();
//! let mut guard = registry.acquire("reindex");
//! if guard.is_free() {
//!     // protected work
//! }
//! guard.release().ok();
//! ```

use crate::clock::{Clock, SystemClock};
use crate::error::CoordinationError;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Identifies one guard handle within a registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GuardId(u64);

impl fmt::Display for GuardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "guard-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug)]
struct Hold {
    guard: GuardId,
    since: Instant,
}

/// Registry entry; created on first use and never removed
#[derive(Debug, Default)]
struct SectionEntry {
    hold: Option<Hold>,
}

/// A section currently held, with how long it has been held
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeldSection {
    pub name: String,
    pub holder: GuardId,
    pub held_for: Duration,
}

struct RegistryInner {
    sections: Mutex<HashMap<String, SectionEntry>>,
    next_guard: AtomicU64,
    clock: Box<dyn Clock>,
}

/// Table of named sections and their holders
///
/// Cloning is cheap and every clone shares the same table, so one registry can be
/// created at startup and handed to each thread that needs it.
#[derive(Clone)]
pub struct ExclusionRegistry {
    inner: Arc<RegistryInner>,
}

impl ExclusionRegistry {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create a registry that timestamps holds with the given clock
    pub fn with_clock(clock: impl Clock) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                sections: Mutex::new(HashMap::new()),
                next_guard: AtomicU64::new(1),
                clock: Box::new(clock),
            }),
        }
    }

    fn sections(&self) -> MutexGuard<'_, HashMap<String, SectionEntry>> {
        self.inner
            .sections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `name` as held and return a guard for it
    ///
    /// Never blocks. If the section is already held the returned guard does not
    /// take it over; check [`ExclusionGuard::is_free`] before doing guarded work.
    pub fn acquire(&self, name: impl Into<String>) -> ExclusionGuard {
        let name = name.into();
        let id = GuardId(self.inner.next_guard.fetch_add(1, Ordering::Relaxed));
        let now = self.inner.clock.now();

        let claimed = {
            let mut sections = self.sections();
            let entry = sections.entry(name.clone()).or_default();
            let free = entry.hold.is_none();
            if free {
                entry.hold = Some(Hold {
                    guard: id,
                    since: now,
                });
            }
            free
        };

        if claimed {
            tracing::debug!(section = %name, guard = %id, "section acquired");
        } else {
            tracing::debug!(section = %name, guard = %id, "section busy");
        }

        ExclusionGuard {
            registry: self.clone(),
            name,
            id,
            claimed,
            released: false,
        }
    }

    /// Run `f` only if `name` is free, releasing the section on every exit path
    ///
    /// Returns `Ok(None)` when the section was busy and `f` was skipped.
    pub fn run_exclusive<R>(
        &self,
        name: impl Into<String>,
        f: impl FnOnce() -> R,
    ) -> Result<Option<R>, CoordinationError> {
        let mut guard = self.acquire(name);
        if !guard.claimed {
            // Nothing of ours to give back; the holder may already be gone
            guard.released = true;
            return Ok(None);
        }
        let output = guard.is_free().then(f);
        guard.release()?;
        Ok(output)
    }

    /// Whether any guard currently holds `name`
    pub fn is_held(&self, name: &str) -> bool {
        self.sections()
            .get(name)
            .is_some_and(|entry| entry.hold.is_some())
    }

    /// Every section name seen so far, sorted
    pub fn section_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sections().keys().cloned().collect();
        names.sort();
        names
    }

    /// Sections currently held, sorted by name
    pub fn held_sections(&self) -> Vec<HeldSection> {
        let clock = &self.inner.clock;
        let mut held: Vec<HeldSection> = self
            .sections()
            .iter()
            .filter_map(|(name, entry)| {
                entry.hold.map(|hold| HeldSection {
                    name: name.clone(),
                    holder: hold.guard,
                    held_for: clock.elapsed_since(hold.since),
                })
            })
            .collect();
        held.sort_by(|a, b| a.name.cmp(&b.name));
        held
    }

    /// Clear the hold on `name` regardless of which guard owns it
    ///
    /// Recovery for holds whose guard was leaked (e.g. `mem::forget`). The
    /// original holder's next `release` reports a usage violation. Returns
    /// whether a hold was cleared.
    pub fn force_release(&self, name: &str) -> bool {
        let cleared = self
            .sections()
            .get_mut(name)
            .and_then(|entry| entry.hold.take());

        match cleared {
            Some(hold) => {
                tracing::warn!(section = %name, guard = %hold.guard, "hold force-released");
                true
            }
            None => false,
        }
    }

    fn release_hold(&self, name: &str, id: GuardId) -> Result<(), CoordinationError> {
        let mut sections = self.sections();
        // Defensive: entries are never removed, so acquire always left one here
        let entry = sections
            .get_mut(name)
            .ok_or_else(|| CoordinationError::MissingEntry {
                name: name.to_string(),
            })?;

        if !entry.hold.is_some_and(|hold| hold.guard == id) {
            return Err(CoordinationError::UsageViolation {
                name: name.to_string(),
            });
        }
        entry.hold = None;
        Ok(())
    }

    fn holds(&self, name: &str, id: GuardId) -> bool {
        self.sections()
            .get(name)
            .and_then(|entry| entry.hold)
            .is_some_and(|hold| hold.guard == id)
    }
}

impl Default for ExclusionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExclusionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = self.sections();
        f.debug_struct("ExclusionRegistry")
            .field("sections", &sections.len())
            .field(
                "held",
                &sections.values().filter(|e| e.hold.is_some()).count(),
            )
            .finish()
    }
}

/// Handle on one named section
///
/// Released explicitly with [`release`](Self::release) or implicitly on drop.
#[derive(Debug)]
#[must_use = "dropping the guard releases the section immediately"]
pub struct ExclusionGuard {
    registry: ExclusionRegistry,
    name: String,
    id: GuardId,
    /// Whether this guard took the section when created
    claimed: bool,
    released: bool,
}

impl ExclusionGuard {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> GuardId {
        self.id
    }

    /// Whether the section is free for this guard's holder to work in
    ///
    /// True only while this guard is the section's holder: it found the section
    /// free on creation, has not been released, and the hold was not cleared
    /// externally. Read under the registry lock.
    pub fn is_free(&self) -> bool {
        self.claimed && !self.released && self.registry.holds(&self.name, self.id)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Give the section back
    ///
    /// A second call, or a release after the hold was cleared externally, is a
    /// [`CoordinationError::UsageViolation`]. Releasing a guard that found the
    /// section busy leaves the current holder untouched, but is also a
    /// violation once the section is no longer held by anyone.
    pub fn release(&mut self) -> Result<(), CoordinationError> {
        if self.released {
            return Err(CoordinationError::UsageViolation {
                name: self.name.clone(),
            });
        }
        self.released = true;

        if !self.claimed {
            if !self.registry.is_held(&self.name) {
                return Err(CoordinationError::UsageViolation {
                    name: self.name.clone(),
                });
            }
            return Ok(());
        }

        self.registry.release_hold(&self.name, self.id)?;
        tracing::debug!(section = %self.name, guard = %self.id, "section released");
        Ok(())
    }
}

impl Drop for ExclusionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.release() {
            tracing::error!(
                section = %self.name,
                guard = %self.id,
                error = %e,
                "release on drop failed"
            );
        }
    }
}

#[cfg(test)]
#[path = "exclusion_tests.rs"]
mod tests;
