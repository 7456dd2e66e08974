//! CLI entry point for cdfplot.
//!
//! Parses arguments with clap, sorts and scans the inputs, writes the gnuplot
//! script, prints the summary to stdout and maps failures to a non-zero exit
//! code. Logging is initialised first so every later step can emit `tracing`
//! diagnostics.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cdfplot_cli::{
    cli::{Cli, CliError, run_cli, write_summary},
    logging::{self, LoggingConfig, LoggingError},
};
use tracing::{error, field};

/// Parse arguments, run, and print the summary.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    write_summary(&summary, BufWriter::new(stdout.lock())).context("failed to print summary")?;
    Ok(())
}

fn main() -> ExitCode {
    let initialised = LoggingConfig::from_env().and_then(logging::init_logging);
    if let Err(err) = initialised {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err.downcast_ref::<CliError>().and_then(|cli_error| match cli_error {
            CliError::Core(core) => Some(core.code()),
            CliError::Output { .. } => None,
        });
        error!(
            error = field::display(format!("{err:#}")),
            code = code.map(|code| field::display(code.as_str())),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
