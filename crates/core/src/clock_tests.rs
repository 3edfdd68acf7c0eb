// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_never_goes_backwards() {
    let clock = SystemClock;
    let t1 = clock.now();
    let t2 = clock.now();
    assert!(t2 >= t1);
}

#[test]
fn fake_clock_stands_still_until_advanced() {
    let clock = FakeClock::new();
    let start = clock.now();
    assert_eq!(clock.elapsed_since(start), Duration::ZERO);

    clock.advance(Duration::from_secs(90));
    assert_eq!(clock.elapsed_since(start), Duration::from_secs(90));
}

#[test]
fn fake_clock_clones_share_time() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let start = clock1.now();

    clock2.advance(Duration::from_secs(30));

    assert_eq!(clock1.elapsed_since(start), Duration::from_secs(30));
}

#[test]
fn elapsed_since_future_instant_saturates() {
    let clock = FakeClock::new();
    let later = clock.now() + Duration::from_secs(5);
    assert_eq!(clock.elapsed_since(later), Duration::ZERO);
}
