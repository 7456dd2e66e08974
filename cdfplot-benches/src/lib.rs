//! Benchmark support crate for cdfplot.
//!
//! Generates seeded synthetic data files for the Criterion benchmarks of the
//! sort and scan stages.

pub mod error;
pub mod source;
