// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_is_nonzero_and_monotone_enough() {
    let clock = SystemClock;
    let t1 = clock.epoch_ms();
    assert!(t1 > 0);
    std::thread::sleep(Duration::from_millis(2));
    let t2 = clock.epoch_ms();
    assert!(t2 >= t1);
}

#[test]
fn fake_clock_starts_at_fixed_epoch() {
    let clock = FakeClock::new();
    assert_eq!(clock.epoch_ms(), 1_000_000_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let t1 = clock.epoch_ms();
    clock.advance(Duration::from_secs(60));
    assert_eq!(clock.epoch_ms(), t1 + 60_000);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    clock2.advance_secs(30);
    assert_eq!(clock1.epoch_ms(), clock2.epoch_ms());
}

#[test]
fn fake_clock_set_epoch_ms() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
}
