//! Run orchestration: sort and scan every input, then write the script.
//!
//! Each input is processed as an independent task. A task that fails is
//! logged and dropped; the run only fails when no task succeeded.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{Span, error, info, instrument};

use crate::{
    Result,
    builder::CdfPlot,
    error::{CdfError, FileError},
    result::FileStats,
    scan::StatisticsScanner,
    script::{PlotSettings, ScriptPaths},
    sort::sort_file,
};

/// An input that was dropped from the run.
#[derive(Debug)]
pub struct FileFailure {
    path: PathBuf,
    error: FileError,
}

impl FileFailure {
    /// The input that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why it failed.
    #[must_use]
    pub const fn error(&self) -> &FileError {
        &self.error
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunOutcome {
    script_path: PathBuf,
    output_name: String,
    results: Vec<FileStats>,
    failures: Vec<FileFailure>,
}

impl RunOutcome {
    /// Where the gnuplot script was written.
    #[must_use]
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// The PDF the script renders.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Per-file statistics in input order.
    #[must_use]
    pub fn results(&self) -> &[FileStats] {
        &self.results
    }

    /// Inputs that were dropped, in input order.
    #[must_use]
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }
}

struct Job<'a> {
    input: &'a Path,
    sorted: PathBuf,
}

fn plan_jobs<'a>(paths: &ScriptPaths, inputs: &'a [PathBuf]) -> Result<Vec<Job<'a>>> {
    if inputs.is_empty() {
        return Err(CdfError::NoInputs);
    }
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(inputs.len());
    let mut jobs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let sorted = paths
            .sorted_path_for(input)
            .ok_or_else(|| CdfError::InvalidInputPath {
                path: input.clone(),
            })?;
        if let Some(first) = claimed.insert(sorted.clone(), input) {
            return Err(CdfError::DuplicateSortedPath {
                first: first.to_path_buf(),
                second: input.clone(),
                sorted,
            });
        }
        jobs.push(Job {
            input: input.as_path(),
            sorted,
        });
    }
    Ok(jobs)
}

#[instrument(
    name = "cdf.process_file",
    skip_all,
    fields(input = %input.display()),
)]
fn process_file(
    settings: &PlotSettings,
    input: &Path,
    sorted: &Path,
) -> core::result::Result<FileStats, FileError> {
    sort_file(input, sorted, settings.column)?;
    let scanner = StatisticsScanner::new(settings.column, settings.show_meta);
    let (total_rows, summary) = scanner.scan_path(sorted)?.into_parts();
    let stats = FileStats::new(input, sorted, total_rows, summary);
    info!(
        name = stats.name(),
        rows = total_rows.get(),
        mean = %settings.format.format(stats.mean().into()),
        median = %settings.format.format(stats.median_value()),
        p99 = %settings.format.format(stats.p99_value()),
        "file processed"
    );
    Ok(stats)
}

fn run_job<'a>(
    settings: &PlotSettings,
    run_span: &Span,
    job: &Job<'a>,
) -> (&'a Path, core::result::Result<FileStats, FileError>) {
    let outcome = run_span.in_scope(|| process_file(settings, job.input, &job.sorted));
    (job.input, outcome)
}

impl CdfPlot {
    /// Sorts and scans every input, then writes `<script_base>.gnu`.
    ///
    /// Sorted copies are written next to the script as `sorted_<name>`.
    /// Inputs that fail are logged, reported in
    /// [`RunOutcome::failures`] and left out of the chart.
    ///
    /// # Errors
    /// Returns [`CdfError::NoInputs`] for an empty input list,
    /// [`CdfError::InvalidInputPath`] for an input without a file name,
    /// [`CdfError::DuplicateSortedPath`] when two inputs share a file name,
    /// [`CdfError::NoUsableInputs`] when every input failed and
    /// [`CdfError::WriteScript`] when the script cannot be written.
    #[instrument(
        name = "cdf.run",
        err,
        skip_all,
        fields(script_base = %script_base.display(), inputs = inputs.len()),
    )]
    pub fn run(&self, script_base: &Path, inputs: &[PathBuf]) -> Result<RunOutcome> {
        let paths = ScriptPaths::from_base(script_base);
        let jobs = plan_jobs(&paths, inputs)?;
        let run_span = Span::current();
        let settings = &self.settings;

        #[cfg(feature = "parallel")]
        let outcomes: Vec<_> = jobs
            .par_iter()
            .map(|job| run_job(settings, &run_span, job))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<_> = jobs
            .iter()
            .map(|job| run_job(settings, &run_span, job))
            .collect();

        let mut results = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (input, outcome) in outcomes {
            match outcome {
                Ok(stats) => results.push(stats),
                Err(err) => {
                    error!(
                        input = %input.display(),
                        code = %err.code(),
                        error = %err,
                        "input dropped"
                    );
                    failures.push(FileFailure {
                        path: input.to_path_buf(),
                        error: err,
                    });
                }
            }
        }
        if results.is_empty() {
            return Err(CdfError::NoUsableInputs {
                attempted: inputs.len(),
            });
        }

        let script = self.render_script(&results, paths.output_name());
        fs::write(paths.script_path(), script).map_err(|source| CdfError::WriteScript {
            path: paths.script_path().to_path_buf(),
            source,
        })?;
        info!(
            script = %paths.script_path().display(),
            series = results.len(),
            dropped = failures.len(),
            "script written"
        );
        Ok(RunOutcome {
            script_path: paths.script_path().to_path_buf(),
            output_name: paths.output_name().to_owned(),
            results,
            failures,
        })
    }
}
