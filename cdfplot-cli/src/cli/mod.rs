//! Command-line surface of cdfplot.
//!
//! One invocation sorts every input, computes its statistics and writes a
//! gnuplot script drawing all CDFs on one chart.

mod commands;

pub use commands::{Cli, CliError, ExecutionSummary, render_summary, run_cli, write_summary};

#[cfg(test)]
mod test_helpers;
