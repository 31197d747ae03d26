//! Shot length batch runs
//!
//! Applies [`shot_length`] to a list of shots from one tree. A shot whose
//! data can't be read is recorded as unavailable and the run continues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plasma::length::{shot_length, ShotLength};
use crate::plasma::source::{SignalSource, TreeProvider};

/// Result for a single shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    /// Shot number
    pub shot: i64,
    /// Tree the current was read from
    pub tree: String,
    /// Outcome
    #[serde(flatten)]
    pub length: ShotLength,
}

/// Results of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// When the run finished
    pub generated_at: DateTime<Utc>,
    /// Threshold used for every shot (A)
    pub threshold: f64,
    /// One record per requested shot, in request order
    pub records: Vec<ShotRecord>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&ShotLength) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.length)).count()
    }

    /// Number of shots with a termination time
    pub fn terminated(&self) -> usize {
        self.count(ShotLength::is_terminated)
    }

    /// Number of shots read successfully but never terminated
    pub fn no_termination(&self) -> usize {
        self.count(|l| *l == ShotLength::NoTermination)
    }

    /// Number of shots whose current could not be read
    pub fn unavailable(&self) -> usize {
        self.count(|l| *l == ShotLength::DataUnavailable)
    }

    /// Record with the latest termination time
    pub fn longest(&self) -> Option<&ShotRecord> {
        self.records
            .iter()
            .filter_map(|r| r.length.time().map(|t| (t, r)))
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, r)| r)
    }
}

/// Compute the shot length of every shot in `shots`
pub fn run_batch(
    provider: &dyn TreeProvider,
    tree: &str,
    shots: &[i64],
    threshold: f64,
) -> BatchReport {
    let records: Vec<ShotRecord> = shots
        .iter()
        .map(|&shot| ShotRecord {
            shot,
            tree: tree.to_string(),
            length: shot_length(provider, &SignalSource::Shot { shot, tree }, threshold),
        })
        .collect();

    let report = BatchReport {
        generated_at: Utc::now(),
        threshold,
        records,
    };
    tracing::info!(
        tree,
        shots = shots.len(),
        terminated = report.terminated(),
        no_termination = report.no_termination(),
        unavailable = report.unavailable(),
        "batch_complete"
    );
    report
}
