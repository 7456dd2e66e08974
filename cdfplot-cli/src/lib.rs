//! Support library for the cdfplot binary.
//!
//! Exposes the argument surface and logging set-up so tests can drive a run
//! without spawning a subprocess.

pub mod cli;
pub mod logging;
