//! Threshold-crossing detection of plasma termination
//!
//! Finds the first sample at which the plasma current crosses the threshold
//! while also falling both over the next sample and over the next
//! [`LOOKAHEAD_SAMPLES`] samples. A single-sample dip is not enough: the
//! current must agree across the short and the long window.

use super::signal::Signal;
use crate::{DEFAULT_THRESHOLD, LOOKAHEAD_SAMPLES};

/// Outcome of running the detector over a signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detection {
    /// Termination found
    Terminated {
        /// Index into the non-negative-time portion of the signal
        index: usize,
        /// Time of that sample in seconds
        time: f64,
    },
    /// No sample satisfied all indicators (or no samples at t >= 0)
    NoTermination,
}

impl Detection {
    /// Termination time, if one was found
    pub fn time(&self) -> Option<f64> {
        match self {
            Detection::Terminated { time, .. } => Some(*time),
            Detection::NoTermination => None,
        }
    }

    /// Termination time with `0.0` standing in for "not found"
    pub fn seconds(&self) -> f64 {
        self.time().unwrap_or(0.0)
    }
}

/// Per-sample indicators over the non-negative-time portion of a signal
///
/// All vectors have the same length. Samples too close to the end of the
/// record for a look-ahead comparison fall back to `current <= threshold`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indicators {
    time: Vec<f64>,
    crossing: Vec<bool>,
    falling: Vec<bool>,
    falling_lookahead: Vec<bool>,
}

impl Indicators {
    /// Number of samples covered
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether no samples were left after filtering
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time base after dropping samples with t < 0
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Sample pair straddles or touches the threshold
    pub fn crossing(&self) -> &[bool] {
        &self.crossing
    }

    /// Current does not rise to the next sample
    pub fn falling(&self) -> &[bool] {
        &self.falling
    }

    /// Current does not rise over the look-ahead window
    pub fn falling_lookahead(&self) -> &[bool] {
        &self.falling_lookahead
    }

    /// Whether all three indicators hold at `index`; `false` past the end
    pub fn met(&self, index: usize) -> bool {
        matches!(
            (
                self.crossing.get(index),
                self.falling.get(index),
                self.falling_lookahead.get(index),
            ),
            (Some(&true), Some(&true), Some(&true))
        )
    }

    /// First index at which all three indicators hold
    pub fn first_met(&self) -> Option<usize> {
        self.crossing
            .iter()
            .zip(&self.falling)
            .zip(&self.falling_lookahead)
            .position(|((&a, &b), &c)| a && b && c)
    }
}

/// Plasma termination detector
///
/// Stateless apart from its threshold, so one detector can be shared
/// across threads and reused for any number of shots.
///
/// # Example
/// ```
/// use shotlength_core::{Detection, ShotLengthDetector};
///
/// let detector = ShotLengthDetector::new(1.2e5);
/// let time: Vec<f64> = (0..11).map(|i| i as f64 * 0.1).collect();
/// let mut current = vec![1e4; 11];
/// current[0] = 3e5;
/// current[1] = 2e5;
///
/// match detector.detect(&time, &current) {
///     Detection::Terminated { index, .. } => assert_eq!(index, 1),
///     Detection::NoTermination => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotLengthDetector {
    /// Termination threshold in amperes
    threshold: f64,
}

impl Default for ShotLengthDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ShotLengthDetector {
    /// Create a detector with the given threshold (amperes)
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Termination threshold in amperes
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compute the termination indicators for a signal
    ///
    /// `time` and `current` must have equal length and `current` must
    /// already be a magnitude. Samples with `time < 0.0` are dropped first
    /// so pre-discharge noise can't produce a crossing.
    pub fn indicators(&self, time: &[f64], current: &[f64]) -> Indicators {
        debug_assert_eq!(time.len(), current.len(), "time/current length mismatch");

        let (time, current): (Vec<f64>, Vec<f64>) = time
            .iter()
            .zip(current)
            .filter(|(t, _)| **t >= 0.0)
            .map(|(&t, &c)| (t, c))
            .unzip();

        let threshold = self.threshold;
        let crossing = current
            .iter()
            .enumerate()
            .map(|(i, &c)| match current.get(i + 1) {
                Some(&next) => (c - threshold) * (next - threshold) <= 0.0,
                None => c <= threshold,
            })
            .collect();

        Indicators {
            time,
            crossing,
            falling: non_increasing(&current, 1, threshold),
            falling_lookahead: non_increasing(&current, LOOKAHEAD_SAMPLES, threshold),
        }
    }

    /// Locate the termination sample
    pub fn detect(&self, time: &[f64], current: &[f64]) -> Detection {
        let indicators = self.indicators(time, current);
        match indicators.first_met() {
            Some(index) => {
                let time = indicators.time[index];
                tracing::debug!(index, time, threshold = self.threshold, "shot_terminated");
                Detection::Terminated { index, time }
            }
            None => {
                tracing::debug!(
                    samples = indicators.len(),
                    threshold = self.threshold,
                    "no_termination"
                );
                Detection::NoTermination
            }
        }
    }

    /// Locate the termination sample of a [`Signal`]
    pub fn detect_signal(&self, signal: &Signal) -> Detection {
        self.detect(signal.time(), signal.current())
    }
}

/// `current[i + step] <= current[i]`, or `current[i] <= threshold` where
/// `i + step` runs past the end of the record
fn non_increasing(current: &[f64], step: usize, threshold: f64) -> Vec<bool> {
    current
        .iter()
        .enumerate()
        .map(|(i, &c)| match current.get(i + step) {
            Some(&ahead) => ahead - c <= 0.0,
            None => c <= threshold,
        })
        .collect()
}

/// Termination time of a current magnitude trace, `0.0` if none is found
///
/// Shorthand for [`ShotLengthDetector::detect`] followed by
/// [`Detection::seconds`].
pub fn detect(time: &[f64], current: &[f64], threshold: f64) -> f64 {
    ShotLengthDetector::new(threshold)
        .detect(time, current)
        .seconds()
}
