//! Plasma current signal model
//!
//! Pairs a plasma current magnitude trace with its time base.

use super::source::{RawSignal, SourceError};

/// Plasma current magnitude (A) against time (s)
///
/// Both sequences have the same length. The current is stored as a
/// magnitude since termination is defined on |Ip|, not on the signed
/// current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signal {
    time: Vec<f64>,
    current: Vec<f64>,
}

impl Signal {
    /// Create a signal from a time base and current magnitudes
    ///
    /// # Errors
    /// Returns [`SourceError::ShapeMismatch`] if the lengths differ.
    ///
    /// # Example
    /// ```
    /// use shotlength_core::Signal;
    ///
    /// let signal = Signal::new(vec![0.0, 0.1], vec![2e5, 1e5]).unwrap();
    /// assert_eq!(signal.len(), 2);
    /// ```
    pub fn new(time: Vec<f64>, current: Vec<f64>) -> Result<Self, SourceError> {
        if time.len() != current.len() {
            return Err(SourceError::ShapeMismatch {
                data: current.len(),
                dim: time.len(),
            });
        }
        Ok(Self { time, current })
    }

    /// Build a signal from raw node contents, taking the current magnitude
    pub fn from_raw(raw: RawSignal) -> Result<Self, SourceError> {
        let RawSignal { data, dim } = raw;
        let current = data.into_iter().map(f64::abs).collect();
        Self::new(dim, current)
    }

    /// Time base in seconds
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Current magnitude in amperes
    pub fn current(&self) -> &[f64] {
        &self.current
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the signal has no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Peak current magnitude, or `None` for an empty signal
    pub fn peak(&self) -> Option<f64> {
        self.current.iter().copied().reduce(f64::max)
    }
}
