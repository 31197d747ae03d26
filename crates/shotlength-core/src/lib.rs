//! Shotlength Core - Plasma current termination detection
//!
//! This library finds the termination time ("shot length") of a plasma
//! discharge by locating where the plasma current falls below a threshold
//! and stays there. Signals are pulled from tree-structured diagnostic
//! stores through the [`plasma::source::TreeProvider`] seam.

pub mod batch;
pub mod plasma;

pub use batch::report::{run_batch, BatchReport, ShotRecord};
pub use plasma::archive::{Archive, ArchiveTree};
pub use plasma::detector::{detect, Detection, Indicators, ShotLengthDetector};
pub use plasma::length::{shot_length, ShotLength};
pub use plasma::signal::Signal;
pub use plasma::source::{fetch_signal, RawSignal, SignalSource, SourceError, Tree, TreeProvider};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default plasma current threshold for termination (120 kA)
pub const DEFAULT_THRESHOLD: f64 = 1.2e5;

/// Tree the plasma current is read from when none is given
pub const DEFAULT_TREE: &str = "magnetics";

/// Look-ahead window (in samples) of the smoothed non-increase check
pub const LOOKAHEAD_SAMPLES: usize = 8;
