//! E2E tests for plasma termination detection
//!
//! Verifies the threshold-crossing behaviour on synthetic discharges:
//! ramp-downs, sustained current, transient dips, pre-shot samples and
//! the trailing edge of the record.

use approx::assert_abs_diff_eq;
use shotlength::{detect, Detection, ShotLengthDetector, LOOKAHEAD_SAMPLES};

/// Linear ramp from 5e5 A down to 0 in 1e4 A steps, then 20 samples at zero
fn ramp_down() -> (Vec<f64>, Vec<f64>) {
    let time: Vec<f64> = (0..70).map(|i| 0.5 + i as f64 * 0.01).collect();
    let current = (0..70)
        .map(|i| (5e5 - 1e4 * i as f64).max(0.0))
        .collect();
    (time, current)
}

/// Ramp-down crossing is reported at the last sample before the current reaches T
#[test]
fn test_ramp_down_crossing_property() {
    let (time, current) = ramp_down();

    for threshold in [1.2e5, 1.25e5, 2.05e5, 3.35e5, 4.99e5] {
        let first_below = current
            .iter()
            .position(|&c| c <= threshold)
            .expect("ramp reaches zero");
        let result = detect(&time, &current, threshold);

        assert_eq!(
            result,
            time[first_below - 1],
            "threshold {} should terminate at the sample before index {}",
            threshold,
            first_below
        );
        assert_abs_diff_eq!(result, time[first_below], epsilon = 0.0101);
    }
}

/// Current above threshold for the whole record never terminates
#[test]
fn test_sustained_current_returns_zero() {
    let time: Vec<f64> = (0..200).map(|i| i as f64 * 0.005).collect();
    let current: Vec<f64> = time
        .iter()
        .map(|&t| 8e5 + 5e4 * (t * 60.0).sin())
        .collect();

    assert_eq!(detect(&time, &current, 1.2e5), 0.0);
    assert_eq!(
        ShotLengthDetector::default().detect(&time, &current),
        Detection::NoTermination
    );
}

/// A one-sample dip on a rising flat-top is rejected
#[test]
fn test_transient_dip_rejected() {
    let time: Vec<f64> = (0..60).map(|i| i as f64 * 0.01).collect();
    let mut current: Vec<f64> = (0..60).map(|i| 4e5 + 1e3 * i as f64).collect();
    current[20] = 5e4;

    let detector = ShotLengthDetector::default();
    let indicators = detector.indicators(&time, &current);

    // The dip does straddle the threshold on both sides
    assert!(indicators.crossing()[19]);
    assert!(indicators.crossing()[20]);
    // ...but the current has recovered within the look-ahead window
    assert!(!indicators.falling_lookahead()[19]);
    assert!(!indicators.falling()[20]);

    assert_eq!(detector.detect(&time, &current), Detection::NoTermination);
    assert_eq!(detect(&time, &current, 1.2e5), 0.0);
}

/// Samples at negative time never influence the result
#[test]
fn test_negative_time_samples_ignored() {
    let (time, current) = ramp_down();
    let baseline = detect(&time, &current, 1.2e5);

    let mut noisy_time: Vec<f64> = (1..=40).rev().map(|i| -0.005 * i as f64).collect();
    let mut noisy_current: Vec<f64> = (0..40)
        .map(|i| if i % 2 == 0 { 0.0 } else { 6e5 })
        .collect();
    noisy_time.extend_from_slice(&time);
    noisy_current.extend_from_slice(&current);

    assert_eq!(detect(&noisy_time, &noisy_current, 1.2e5), baseline);

    let detector = ShotLengthDetector::default();
    assert_eq!(
        detector.indicators(&noisy_time, &noisy_current),
        detector.indicators(&time, &current)
    );
}

/// Last LOOKAHEAD_SAMPLES samples at or below T satisfy the look-ahead by definition
#[test]
fn test_trailing_edge_lookahead() {
    let mut current = vec![5e5; 20];
    // Rising, but still below threshold, through the end of the record
    current.extend((1..=LOOKAHEAD_SAMPLES).map(|i| 1e4 * i as f64));
    let time: Vec<f64> = (0..current.len()).map(|i| i as f64 * 0.1).collect();

    let detector = ShotLengthDetector::default();
    let indicators = detector.indicators(&time, &current);
    let tail = current.len() - LOOKAHEAD_SAMPLES;

    assert!(indicators.falling_lookahead()[tail..].iter().all(|&b| b));
    assert!(indicators.falling()[current.len() - 1]);
    assert!(indicators.crossing()[current.len() - 1]);

    assert_eq!(
        detector.detect(&time, &current),
        Detection::Terminated {
            index: 19,
            time: time[19]
        }
    );
}

/// Step from 2e5 to 1e5 A between t=1 and t=2
#[test]
fn test_step_down_scenario() {
    let time = [-1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
    let current = [
        2e5, 2e5, 2e5, 1e5, 1e5, 1e5, 1e5, 1e5, 1e5, 1e5, 1e5,
    ];

    // t=1 (filtered index 1) straddles the drop; its 8-step look-ahead reaches t=9
    assert_eq!(detect(&time, &current, 1.2e5), 1.0);
    assert_eq!(
        ShotLengthDetector::new(1.2e5).detect(&time, &current),
        Detection::Terminated {
            index: 1,
            time: 1.0
        }
    );
}

/// Nothing left after dropping negative times
#[test]
fn test_empty_after_filtering() {
    assert_eq!(detect(&[], &[], 1.2e5), 0.0);
    assert_eq!(detect(&[-0.2, -0.1], &[1e4, 1e4], 1.2e5), 0.0);
    assert!(ShotLengthDetector::default()
        .indicators(&[-0.2, -0.1], &[1e4, 1e4])
        .is_empty());
}

/// The detector holds no per-call state and can be shared across threads
#[test]
fn test_concurrent_detection() {
    let detector = ShotLengthDetector::default();
    let (time, current) = ramp_down();
    let expected = detector.detect(&time, &current);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| detector.detect(&time, &current)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
