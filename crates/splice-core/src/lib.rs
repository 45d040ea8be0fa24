//! Splice Core - Foundation types for timeline editing
//!
//! This crate provides the fundamental types used throughout Splice:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - The workspace error type
//! - Editor configuration (clip length floor, drift tolerance, lane counts)

pub mod config;
pub mod error;
pub mod time;

pub use config::{EditorConfig, LaneConfig, RippleScope};
pub use error::{Result, SpliceError};
pub use time::{FrameRate, RationalTime, TimeRange};
