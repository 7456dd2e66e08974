//! Per-file statistics produced by the scan stage.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::value::SampleValue;

/// Order statistics gathered when metadata is requested.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanSummary {
    mean: f64,
    mean_row: Option<NonZeroUsize>,
    median: SampleValue,
    p99: SampleValue,
}

impl ScanSummary {
    /// Bundles the statistics of one scan.
    #[must_use]
    pub const fn new(
        mean: f64,
        mean_row: Option<NonZeroUsize>,
        median: SampleValue,
        p99: SampleValue,
    ) -> Self {
        Self {
            mean,
            mean_row,
            median,
            p99,
        }
    }

    /// Arithmetic mean of the column.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// 1-based index of the first row whose value reaches the mean, if the
    /// scan got that far.
    #[must_use]
    pub const fn mean_row(&self) -> Option<NonZeroUsize> {
        self.mean_row
    }

    /// Value at the median rank.
    #[must_use]
    pub const fn median(&self) -> SampleValue {
        self.median
    }

    /// Value at the 99th percentile rank.
    #[must_use]
    pub const fn p99(&self) -> SampleValue {
        self.p99
    }
}

/// The result of processing one input file.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use cdfplot_core::{FileStats, SampleValue};
///
/// let rows = NonZeroUsize::new(4).expect("non-zero");
/// let stats = FileStats::new("lat_a.txt", "sorted_lat_a.txt", rows, None);
/// assert_eq!(stats.name(), "lat_a");
/// assert_eq!(stats.median_value(), SampleValue::ZERO);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FileStats {
    name: String,
    source_path: PathBuf,
    sorted_path: PathBuf,
    total_rows: NonZeroUsize,
    summary: Option<ScanSummary>,
}

impl FileStats {
    /// Creates a result, deriving the display name from `source_path`.
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        sorted: impl Into<PathBuf>,
        total_rows: NonZeroUsize,
        summary: Option<ScanSummary>,
    ) -> Self {
        let source_path = source.into();
        Self {
            name: display_name(&source_path),
            source_path,
            sorted_path: sorted.into(),
            total_rows,
            summary,
        }
    }

    /// Display label: the file name without its last extension.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the original input.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Path of the sorted copy.
    #[must_use]
    pub fn sorted_path(&self) -> &Path {
        &self.sorted_path
    }

    /// File name of the sorted copy as referenced from the script.
    #[must_use]
    pub fn sorted_file_name(&self) -> String {
        self.sorted_path.file_name().map_or_else(
            || self.sorted_path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    /// Number of rows in the sorted copy.
    #[must_use]
    pub const fn total_rows(&self) -> NonZeroUsize {
        self.total_rows
    }

    /// Statistics gathered when metadata was requested.
    #[must_use]
    pub const fn summary(&self) -> Option<&ScanSummary> {
        self.summary.as_ref()
    }

    /// Mean of the column, or zero when metadata was not requested.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.summary.map_or(0.0, |summary| summary.mean)
    }

    /// Median value, or [`SampleValue::ZERO`] when metadata was not requested.
    #[must_use]
    pub fn median_value(&self) -> SampleValue {
        self.summary.map_or(SampleValue::ZERO, |summary| summary.median)
    }

    /// P99 value, or [`SampleValue::ZERO`] when metadata was not requested.
    #[must_use]
    pub fn p99_value(&self) -> SampleValue {
        self.summary.map_or(SampleValue::ZERO, |summary| summary.p99)
    }

    /// Fraction of rows before the mean is reached, `mean_row / total_rows`.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "the fraction is a CDF coordinate in [0, 1]"
    )]
    #[must_use]
    pub fn mean_fraction(&self) -> Option<f64> {
        let row = self.summary?.mean_row?;
        Some(row.get() as f64 / self.total_rows.get() as f64)
    }
}

/// Derives a display label from `path`: the file name with its last extension
/// stripped.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use cdfplot_core::display_name;
///
/// assert_eq!(display_name(Path::new("/data/lat_a.txt")), "lat_a");
/// assert_eq!(display_name(Path::new("trace.tar.gz")), "trace.tar");
/// assert_eq!(display_name(Path::new("plain")), "plain");
/// ```
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_owned())
}
