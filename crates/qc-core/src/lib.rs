//! qc-core: shared error type, configuration, and timecode handling.
//!
//! This crate is the foundational dependency for the other qc-* crates. It
//! has no knowledge of HTTP or subprocesses; everything here is plain data
//! and pure functions.

pub mod config;
pub mod error;
pub mod timecode;

pub use error::{Error, Result};
