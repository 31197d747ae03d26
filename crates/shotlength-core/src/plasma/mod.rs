//! Plasma current analysis module
//!
//! This module contains the shot length pipeline:
//! - Plasma current signal model ([`signal`])
//! - Threshold-crossing termination detection ([`detector`])
//! - Tree and node resolution of the Ip signal ([`source`])
//! - File-backed tree archive ([`archive`])
//! - Top-level shot length entry point ([`length`])

pub mod archive;
pub mod detector;
pub mod length;
pub mod signal;
pub mod source;
