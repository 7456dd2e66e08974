//! Argument parsing and command execution for the cdfplot CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use cdfplot_core::{CdfError, CdfPlotBuilder, NumberFormat, RunOutcome, SampleValue};
use clap::Parser;
use thiserror::Error;
use tracing::{info, instrument};

/// Options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "cdfplot",
    about = "Sort numeric data files and write a gnuplot script plotting their CDFs."
)]
pub struct Cli {
    /// Script path without extension; the script is written to
    /// `<SCRIPT_BASE>.gnu` and renders `<name>.pdf`.
    pub script_base: PathBuf,

    /// Data files, one series each.
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// 1-based column holding the values.
    #[arg(short = 'k', long = "column", default_value_t = 1)]
    pub column: usize,

    /// Compute mean, median and P99 and label them on the chart.
    #[arg(short = 'm', long = "show-meta")]
    pub show_meta: bool,

    /// Chart title.
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// X-axis label.
    #[arg(short = 'x', long = "xlabel")]
    pub xlabel: Option<String>,

    /// Draw the legend above the chart instead of bottom right.
    #[arg(short = 'u', long = "upper-legend")]
    pub upper_legend: bool,

    /// Use a logarithmic x axis.
    #[arg(short = 'l', long = "logx")]
    pub logx: bool,

    /// printf-style pattern for the statistics, e.g. `%.2f`.
    #[arg(short = 'p', long = "numpat")]
    pub numpat: Option<String>,
}

/// Errors surfaced while executing the command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The run itself failed.
    #[error(transparent)]
    Core(#[from] CdfError),
    /// Writing the summary failed.
    #[error("failed to write summary: {source}")]
    Output {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// What one invocation produced.
#[derive(Debug)]
pub struct ExecutionSummary {
    /// Script, output and per-file statistics.
    pub outcome: RunOutcome,
    /// Formatting applied to the statistics.
    pub format: NumberFormat,
    /// Whether statistics were computed.
    pub show_meta: bool,
}

/// Executes the run described by `cli`.
///
/// # Errors
/// Returns [`CliError::Core`] when the configuration is invalid or no input
/// produced a result.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::ffi::OsStr;
/// # use cdfplot_cli::cli::{Cli, run_cli};
/// # use clap::Parser;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let input = dir.path().join("a.txt");
/// std::fs::write(&input, "3\n1\n2\n")?;
/// let base = dir.path().join("fig");
/// let cli = Cli::try_parse_from([
///     OsStr::new("cdfplot"),
///     base.as_os_str(),
///     input.as_os_str(),
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.outcome.results().len(), 1);
/// assert!(dir.path().join("fig.gnu").exists());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(inputs = cli.inputs.len(), column = cli.column, show_meta = cli.show_meta),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let plot = CdfPlotBuilder::new()
        .with_column(cli.column)
        .with_show_meta(cli.show_meta)
        .with_title(cli.title)
        .with_xlabel(cli.xlabel)
        .with_logx(cli.logx)
        .with_upper_legend(cli.upper_legend)
        .with_number_pattern(cli.numpat)
        .build()?;
    let outcome = plot.run(&cli.script_base, &cli.inputs)?;
    info!(
        script = %outcome.script_path().display(),
        output = outcome.output_name(),
        "command completed"
    );
    Ok(ExecutionSummary {
        outcome,
        format: plot.number_format().clone(),
        show_meta: plot.show_meta(),
    })
}

/// Renders `summary` as plain text: the script and chart names, one line per
/// plotted file and one per dropped input.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let outcome = &summary.outcome;
    writeln!(writer, "script: {}", outcome.script_path().display())?;
    writeln!(writer, "output: {}", outcome.output_name())?;
    for stats in outcome.results() {
        write!(writer, "{}\trows={}", stats.name(), stats.total_rows())?;
        if summary.show_meta {
            let format = &summary.format;
            write!(
                writer,
                "\tmean={}\tmedian={}\tp99={}",
                format.format(SampleValue::Float(stats.mean())),
                format.format(stats.median_value()),
                format.format(stats.p99_value()),
            )?;
        }
        writeln!(writer)?;
    }
    for failure in outcome.failures() {
        writeln!(
            writer,
            "dropped: {} ({})",
            failure.path().display(),
            failure.error().code()
        )?;
    }
    Ok(())
}

/// Renders `summary` to `writer` and flushes it.
///
/// # Errors
/// Returns [`CliError::Output`] when writing or flushing fails.
pub fn write_summary(summary: &ExecutionSummary, mut writer: impl Write) -> Result<(), CliError> {
    render_summary(summary, &mut writer).map_err(|source| CliError::Output { source })?;
    writer.flush().map_err(|source| CliError::Output { source })
}
