//! Shotlength - plasma discharge termination time
//!
//! This library re-exports the detector, tree access and batch runner from
//! `shotlength-core`, and adds the command-line configuration.

pub mod config;

pub use shotlength_core::batch;
pub use shotlength_core::plasma;

pub use shotlength_core::{
    detect, fetch_signal, run_batch, shot_length, Archive, ArchiveTree, BatchReport, Detection,
    Indicators, RawSignal, ShotLength, ShotLengthDetector, ShotRecord, Signal, SignalSource,
    SourceError, Tree, TreeProvider,
};
pub use shotlength_core::{DEFAULT_THRESHOLD, DEFAULT_TREE, LOOKAHEAD_SAMPLES, VERSION};
