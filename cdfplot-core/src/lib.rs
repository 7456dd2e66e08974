//! Core library for cdfplot.
//!
//! Sorts numeric data files by a selected column, computes per-file order
//! statistics (row count, mean, median and 99th percentile) over the sorted
//! copies, and assembles a gnuplot script that draws the empirical cumulative
//! distribution of every input on one chart.
//!
//! The entry point is [`CdfPlotBuilder`], which validates the run
//! configuration and produces a [`CdfPlot`]:
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! use cdfplot_core::CdfPlotBuilder;
//!
//! let plot = CdfPlotBuilder::new()
//!     .with_column(2)
//!     .with_show_meta(true)
//!     .build()?;
//! let outcome = plot.run(Path::new("out/latency"), &[PathBuf::from("a.txt")])?;
//! assert_eq!(outcome.output_name(), "latency.pdf");
//! # Ok::<(), cdfplot_core::CdfError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod builder;
mod column;
mod error;
mod number_format;
mod pipeline;
mod result;
mod scan;
mod script;
mod sort;
mod value;

pub use crate::{
    aggregate::ColumnAggregate,
    builder::{CdfPlot, CdfPlotBuilder},
    column::Column,
    error::{CdfError, CdfErrorCode, FileError, FileErrorCode, Result},
    number_format::{MAX_PATTERN_FIELD, NumberFormat, NumberPattern, PatternError},
    pipeline::{FileFailure, RunOutcome},
    result::{FileStats, ScanSummary, display_name},
    scan::{PercentileRanks, ScanReport, StatisticsScanner, count_rows},
    script::{LegendPlacement, ScriptPaths},
    sort::{numeric_key, sort_file, sort_rows},
    value::SampleValue,
};
