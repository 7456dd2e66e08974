//! Small helpers shared across CLI tests.

use std::ffi::OsString;
use std::path::Path;

use clap::Parser;

use super::{Cli, CliError, ExecutionSummary, render_summary, run_cli};

/// Parses `args` after the binary name, panicking on rejection.
pub(super) fn parse(args: &[&str]) -> Cli {
    let argv = std::iter::once("cdfplot").chain(args.iter().copied());
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments must parse: {err}"),
    }
}

/// Builds a [`Cli`] plotting `inputs` into `<dir>/fig` with extra `flags`.
pub(super) fn cli_for(dir: &Path, inputs: &[&Path], flags: &[&str]) -> Cli {
    let mut argv: Vec<OsString> = vec!["cdfplot".into()];
    argv.extend(flags.iter().map(OsString::from));
    argv.push(dir.join("fig").into_os_string());
    argv.extend(inputs.iter().map(|input| input.as_os_str().to_owned()));
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments must parse: {err}"),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn rendered(summary: &ExecutionSummary) -> String {
    let mut buffer = Vec::new();
    if let Err(err) = render_summary(summary, &mut buffer) {
        panic!("rendering into memory cannot fail: {err}");
    }
    match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) => panic!("summary must be UTF-8: {err}"),
    }
}
