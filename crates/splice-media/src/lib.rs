//! Splice Media - probing and import
//!
//! This crate handles:
//! - Media file probing through ffprobe
//! - Fallback metadata when probing fails
//! - A background worker that turns import tickets into completions

pub mod probe;
pub mod worker;

pub use probe::{probe_or_fallback, FfprobeProber, MediaProbe, ProbeOutcome, Prober};
pub use worker::ProbeWorker;
