//! Integration tests for the rep counter
//!
//! Properties of the hysteresis contract over generated signal sequences,
//! in both the increasing (vertical) and decreasing (knee angle) direction.

use gymbuddy::core::RepCounter;
use gymbuddy::types::{Phase, RepEvent, Sample, Thresholds};
use gymbuddy::{DEPTH_DOWN_ENTER, DEPTH_UP_ENTER};
use pretty_assertions::assert_eq;

fn vertical() -> RepCounter {
    RepCounter::new(Thresholds::new(DEPTH_DOWN_ENTER, DEPTH_UP_ENTER).unwrap()).unwrap()
}

fn knee() -> RepCounter {
    RepCounter::new(Thresholds::new(110.0, 160.0).unwrap()).unwrap()
}

fn events(counter: &mut RepCounter, signals: impl IntoIterator<Item = f64>) -> Vec<RepEvent> {
    signals.into_iter().filter_map(|s| counter.observe(s)).collect()
}

/// `steps` evenly spaced values from `from` to `to` inclusive
fn ramp(from: f64, to: f64, steps: usize) -> Vec<f64> {
    (0..=steps)
        .map(|i| from + (to - from) * i as f64 / steps as f64)
        .collect()
}

#[test]
fn test_reference_sequence_counts_one_rep() {
    let mut counter = vertical();
    let got = events(&mut counter, [0.0, 0.12, 0.13, 0.04, 0.0]);
    assert_eq!(got, vec![RepEvent::DepthReached, RepEvent::RepCompleted(1)]);
    assert_eq!(counter.rep_count(), 1);
}

#[test]
fn test_single_traversal_adds_exactly_one_rep() {
    for steps in [2, 5, 17, 100] {
        let mut counter = vertical();
        let mut signals = ramp(-0.2, 0.25, steps);
        signals.extend(ramp(0.25, -0.2, steps));
        let got = events(&mut counter, signals);
        assert_eq!(got, vec![RepEvent::DepthReached, RepEvent::RepCompleted(1)], "steps={}", steps);
    }
}

#[test]
fn test_single_traversal_knee_angle() {
    let mut counter = knee();
    let mut signals = ramp(178.0, 70.0, 40);
    signals.extend(ramp(70.0, 178.0, 40));
    assert_eq!(
        events(&mut counter, signals),
        vec![RepEvent::DepthReached, RepEvent::RepCompleted(1)]
    );
}

#[test]
fn test_oscillation_inside_dead_zone_is_inert() {
    let mut counter = vertical();
    let signals: Vec<f64> = (0..500)
        .map(|i| 0.075 + 0.024 * ((i as f64) * 0.7).sin())
        .collect();
    assert!(events(&mut counter, signals).is_empty());
    assert_eq!(counter.phase(), Phase::Up);
    assert_eq!(counter.rep_count(), 0);

    // same while holding the bottom
    counter.observe(0.3);
    let signals: Vec<f64> = (0..500)
        .map(|i| 0.075 + 0.024 * ((i as f64) * 1.3).cos())
        .collect();
    assert!(events(&mut counter, signals).is_empty());
    assert_eq!(counter.phase(), Phase::Down);
}

#[test]
fn test_down_without_return_fires_one_depth_event() {
    let mut counter = knee();
    let mut signals = ramp(175.0, 80.0, 30);
    // wobble at the bottom and partway up, never past 160
    signals.extend([95.0, 85.0, 120.0, 150.0, 159.9, 160.0, 100.0]);
    let got = events(&mut counter, signals);
    assert_eq!(got, vec![RepEvent::DepthReached]);
    assert_eq!(counter.rep_count(), 0);
}

#[test]
fn test_bounded_noise_never_double_counts() {
    // noise amplitude 0.02 < dead zone 0.05
    let noise = |i: usize| 0.02 * (((i * 7919) % 13) as f64 / 6.0 - 1.0);
    let mut counter = vertical();
    let mut signals = Vec::new();
    for rep in 0..10 {
        for i in 0..20 {
            signals.push(0.0 + noise(rep * 100 + i));
        }
        for i in 0..20 {
            signals.push(0.15 + noise(rep * 100 + 50 + i));
        }
    }
    signals.push(0.0);
    let got = events(&mut counter, signals);
    let reps = got.iter().filter(|e| matches!(e, RepEvent::RepCompleted(_))).count();
    assert_eq!(reps, 10);
    assert_eq!(counter.rep_count(), 10);
}

#[test]
fn test_repeated_identical_sample_is_idempotent() {
    for start in [0.0, 0.2] {
        let mut counter = vertical();
        counter.observe(start);
        let phase = counter.phase();
        for _ in 0..1000 {
            assert_eq!(counter.observe(0.07), None);
        }
        assert_eq!(counter.phase(), phase);
        assert_eq!(counter.rep_count(), 0);
    }
}

#[test]
fn test_rep_count_monotonic_with_gaps() {
    let mut counter = vertical();
    let mut last = 0;
    let pattern = [Some(0.0), None, Some(0.2), None, None, Some(0.01), Some(f64::NAN)];
    for _ in 0..20 {
        for value in pattern {
            counter.observe(Sample::from(value));
            assert!(counter.rep_count() >= last);
            last = counter.rep_count();
        }
    }
    assert_eq!(counter.rep_count(), 20);
    assert_eq!(counter.samples_missing(), 20 * 4);
}

#[test]
fn test_sessions_do_not_share_state() {
    let mut a = vertical();
    let mut b = vertical();
    a.observe(0.2);
    a.observe(0.0);
    assert_eq!(a.rep_count(), 1);
    assert_eq!(b.rep_count(), 0);
    assert_eq!(b.observe(0.0), None);
}

#[test]
fn test_invalid_configuration_rejected() {
    assert!(Thresholds::new(0.1, 0.1).is_err());
    assert!(Thresholds::new(0.1, 0.0995).is_err());
    assert!(Thresholds::new(f64::INFINITY, 0.0).is_err());
    assert!(RepCounter::new(Thresholds { down_enter: 90.0, up_enter: 90.0 }).is_err());
}
