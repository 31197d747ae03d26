//! Batch processing over many shots

pub mod report;
