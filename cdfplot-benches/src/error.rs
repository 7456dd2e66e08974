//! Benchmark setup error type.

use crate::source::SyntheticError;

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic data generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Writing or reading a fixture file failed.
    #[error("fixture i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// Sorting or scanning a fixture failed.
    #[error("fixture processing failed: {0}")]
    File(#[from] cdfplot_core::FileError),
}
