//! Integration test crate for Splice Studio.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every splice crate to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod playback;

#[cfg(test)]
mod import;

#[cfg(test)]
mod invariants;
