// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::mpsc;
use std::time::{Duration, Instant};

#[test]
fn free_lock_is_acquired() {
    let lock = SectionLock::new(());
    let token = TryLockToken::try_acquire(&lock);

    assert!(token.acquired());
    assert!(token.is_held());
    assert!(lock.is_locked());
}

#[test]
fn busy_lock_is_not_acquired() {
    let lock = SectionLock::new(());
    let _holder = lock.try_acquire();
    let token = lock.try_acquire();

    assert!(!token.acquired());
    assert!(!token.is_held());
    assert!(token.get().is_none());
}

#[test]
fn release_of_failed_attempt_keeps_holder() {
    let lock = SectionLock::new(());
    let holder = lock.try_acquire();
    let mut failed = lock.try_acquire();

    failed.release();
    failed.release();

    assert!(holder.is_held());
    assert!(lock.is_locked());
}

#[test]
fn release_is_idempotent() {
    let lock = SectionLock::new(());
    let mut token = lock.try_acquire();

    token.release();
    assert!(!lock.is_locked());
    assert!(!token.is_held());
    assert!(token.acquired());

    let other = lock.try_acquire();
    token.release();
    assert!(other.is_held());
    assert!(lock.is_locked());
}

#[test]
fn drop_releases_lock() {
    let lock = SectionLock::new(());
    {
        let token = lock.try_acquire();
        assert!(token.acquired());
    }
    assert!(!lock.is_locked());
}

#[test]
fn unshared_token_is_always_acquired() {
    let first = TryLockToken::unshared();
    let second = TryLockToken::unshared();

    assert!(first.acquired());
    assert!(second.acquired());
}

#[test]
fn token_gives_access_to_protected_value() {
    let lock = SectionLock::new(vec![1, 2]);
    {
        let mut token = lock.try_acquire();
        if let Some(items) = token.get_mut() {
            items.push(3);
        }
    }

    let token = lock.try_acquire();
    assert_eq!(token.get(), Some(&vec![1, 2, 3]));
}

#[test]
fn run_or_skip_runs_when_free() {
    let lock = SectionLock::new(0u32);

    let result = lock.run_or_skip(|count| {
        *count += 1;
        *count
    });

    assert_eq!(result, Some(1));
    assert!(!lock.is_locked());
}

#[test]
fn run_or_skip_skips_when_busy() {
    let lock = SectionLock::new(0u32);
    let _holder = lock.try_acquire();

    let result = lock.run_or_skip(|count| *count += 1);

    assert!(result.is_none());
}

#[test]
fn run_or_skip_releases_on_panic() {
    let lock = SectionLock::new(());
    let cloned = lock.clone();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        cloned.run_or_skip(|_| panic!("boom"));
    }));

    assert!(outcome.is_err());
    assert!(!lock.is_locked());
}

#[test]
fn attempt_on_lock_held_by_other_thread_returns_immediately() {
    let lock = SectionLock::new(());
    let (held_tx, held_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel::<()>();

    std::thread::scope(|s| {
        let holder_lock = lock.clone();
        s.spawn(move || {
            let _token = holder_lock.try_acquire();
            held_tx.send(()).unwrap();
            done_rx.recv().unwrap();
        });

        held_rx.recv().unwrap();
        let start = Instant::now();
        let mut token = lock.try_acquire();
        let elapsed = start.elapsed();

        assert!(!token.acquired());
        assert!(elapsed < Duration::from_secs(1));
        token.release();
        assert!(lock.is_locked());

        done_tx.send(()).unwrap();
    });

    assert!(!lock.is_locked());
}
