//! Shot length entry point
//!
//! Resolves the plasma current through a [`TreeProvider`], runs the
//! [`ShotLengthDetector`] and reports a tagged [`ShotLength`]. Data access
//! failures never escape: they are logged once as a warning and reported as
//! [`ShotLength::DataUnavailable`] so batch runs over many shots keep going.

use serde::{Deserialize, Serialize};

use super::detector::{Detection, ShotLengthDetector};
use super::source::{fetch_signal, SignalSource, TreeProvider};

/// Result of a shot length query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShotLength {
    /// Plasma terminated at `time` seconds
    Terminated { time: f64 },
    /// Current was read but never fell below the threshold for good
    NoTermination,
    /// Current could not be read
    DataUnavailable,
}

impl ShotLength {
    /// Termination time, if one was found
    pub fn time(&self) -> Option<f64> {
        match self {
            ShotLength::Terminated { time } => Some(*time),
            _ => None,
        }
    }

    /// Termination time in seconds, `0.0` for both non-event cases
    ///
    /// Matches the sentinel convention of older pipelines that can't tell
    /// "no termination" from "no data".
    pub fn seconds(&self) -> f64 {
        self.time().unwrap_or(0.0)
    }

    /// Whether a termination time was found
    pub fn is_terminated(&self) -> bool {
        matches!(self, ShotLength::Terminated { .. })
    }

    /// Short status label for reports
    pub fn label(&self) -> &'static str {
        match self {
            ShotLength::Terminated { .. } => "terminated",
            ShotLength::NoTermination => "no_termination",
            ShotLength::DataUnavailable => "data_unavailable",
        }
    }
}

impl From<Detection> for ShotLength {
    fn from(detection: Detection) -> Self {
        match detection {
            Detection::Terminated { time, .. } => ShotLength::Terminated { time },
            Detection::NoTermination => ShotLength::NoTermination,
        }
    }
}

/// Termination time of the plasma current described by `source`
///
/// # Arguments
/// * `provider` - Opens trees for [`SignalSource::Shot`] sources
/// * `source` - Open tree handle or (shot, tree name) pair
/// * `threshold` - Termination threshold in amperes
///
/// # Example
/// ```
/// use shotlength_core::{shot_length, Archive, ShotLength, SignalSource};
///
/// let archive = Archive::new("/nonexistent");
/// let result = shot_length(&archive, &SignalSource::shot(1140729030), 1.2e5);
/// assert_eq!(result, ShotLength::DataUnavailable);
/// assert_eq!(result.seconds(), 0.0);
/// ```
pub fn shot_length(
    provider: &dyn TreeProvider,
    source: &SignalSource<'_>,
    threshold: f64,
) -> ShotLength {
    let signal = match fetch_signal(provider, source) {
        Ok(signal) => signal,
        Err(e) => {
            tracing::warn!(source = %source, error = %e, "Could not load plasma current data");
            return ShotLength::DataUnavailable;
        }
    };

    let length = ShotLength::from(ShotLengthDetector::new(threshold).detect_signal(&signal));
    tracing::info!(
        source = %source,
        status = length.label(),
        time = length.seconds(),
        "shot_length"
    );
    length
}
