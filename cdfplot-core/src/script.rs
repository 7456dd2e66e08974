//! gnuplot script assembly.

use std::{
    ffi::OsString,
    fmt::{self, Write as _},
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{
    column::Column, number_format::NumberFormat, result::FileStats, value::SampleValue,
};

/// Where the legend box is drawn.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LegendPlacement {
    /// Inside the plot, bottom right.
    #[default]
    BottomRight,
    /// Above the plot, entries laid out horizontally.
    TopOutside,
}

impl LegendPlacement {
    /// Arguments of the `set key box` directive.
    #[must_use]
    pub const fn key_clause(self) -> &'static str {
        match self {
            Self::BottomRight => "bottom right",
            Self::TopOutside => "top center horizontal outside",
        }
    }
}

/// Paths derived from the script base path given on the command line.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use cdfplot_core::ScriptPaths;
///
/// let paths = ScriptPaths::from_base(Path::new("out/latency"));
/// assert_eq!(paths.script_path(), Path::new("out/latency.gnu"));
/// assert_eq!(paths.output_name(), "latency.pdf");
/// assert_eq!(
///     paths.sorted_path_for(Path::new("/data/a.txt")),
///     Some(Path::new("out/sorted_a.txt").to_path_buf())
/// );
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScriptPaths {
    directory: PathBuf,
    script_path: PathBuf,
    output_name: String,
}

impl ScriptPaths {
    /// Derives the script location, its directory and the PDF name from
    /// `base`, which carries no extension.
    ///
    /// The script always sits in [`ScriptPaths::directory`], so a trailing
    /// separator (`out/`) names the script `out.gnu` beside the sorted copies.
    #[must_use]
    pub fn from_base(base: &Path) -> Self {
        let directory = base.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = base.file_name().unwrap_or_default();
        let mut script = stem.to_os_string();
        script.push(".gnu");
        Self {
            script_path: directory.join(script),
            directory,
            output_name: format!("{}.pdf", stem.to_string_lossy()),
        }
    }

    /// Directory holding the script and the sorted copies.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the `.gnu` script.
    #[must_use]
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// File name of the PDF the script renders.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Location of the sorted copy of `input`, or `None` if `input` has no
    /// file name.
    #[must_use]
    pub fn sorted_path_for(&self, input: &Path) -> Option<PathBuf> {
        let name = input.file_name()?;
        let mut sorted = OsString::from("sorted_");
        sorted.push(name);
        Some(self.directory.join(sorted))
    }
}

/// Presentation settings shared by the scan and assembly stages.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PlotSettings {
    pub(crate) column: Column,
    pub(crate) show_meta: bool,
    pub(crate) title: Option<String>,
    pub(crate) xlabel: Option<String>,
    pub(crate) logx: bool,
    pub(crate) legend: LegendPlacement,
    pub(crate) format: NumberFormat,
}

const TERMINAL: &str = r#"set terminal pdfcairo lw 2 font "Times New Roman,26" size 4,3"#;

const AXES: &str = "set ylabel \"CDF\"\nset yrange [0:1]\nset ytics 0.2";

const RECT_STYLE: &str = "set style rect fc lt -1 fs solid 0.15 noborder";

const POINT_STYLE: &str = "point pointtype 7 pointsize 1.5";

fn double_quoted(text: &str) -> String {
    text.replace('"', "\\\"")
}

fn legend_title(name: &str) -> String {
    name.replace('_', "\\_").replace('\'', "''")
}

/// Renders the complete script for `results`.
#[expect(clippy::unreachable, reason = "formatting into a String is infallible")]
pub(crate) fn render(settings: &PlotSettings, results: &[FileStats], output_name: &str) -> String {
    let mut script = String::new();
    if write_script(&mut script, settings, results, output_name).is_err() {
        unreachable!("formatting into a String is infallible");
    }
    script
}

fn write_script(
    script: &mut String,
    settings: &PlotSettings,
    results: &[FileStats],
    output_name: &str,
) -> fmt::Result {
    for result in results {
        writeln!(script, "# input: {}", result.sorted_file_name())?;
    }
    writeln!(script, "# output: {output_name}")?;
    writeln!(script)?;
    writeln!(script, "{TERMINAL}")?;
    writeln!(script, "set output \"{}\"", double_quoted(output_name))?;
    writeln!(script, "{AXES}")?;
    writeln!(script, "set key box {}", settings.legend.key_clause())?;
    writeln!(script, "{RECT_STYLE}")?;
    writeln!(script, "set grid")?;

    if let Some(title) = &settings.title {
        writeln!(script, "set title \"{}\"", double_quoted(title))?;
    }
    if settings.logx {
        writeln!(script, "set logscale x")?;
    }
    if let Some(xlabel) = &settings.xlabel {
        writeln!(script, "set xlabel \"{}\"", double_quoted(xlabel))?;
    }

    if settings.show_meta {
        let mut next_label = 1;
        for result in results {
            next_label = write_labels(script, settings, result, next_label)?;
        }
    }

    for (index, result) in results.iter().enumerate() {
        let separator = if index == 0 { "plot " } else { ",\\\n\t" };
        write!(
            script,
            "{separator}\"{file}\" using ((${column})):(1./{rows}.) with linespoints \
             title '{title}' lw 2 lt {line_type} smooth cumulative",
            file = result.sorted_file_name(),
            column = settings.column.get(),
            rows = result.total_rows(),
            title = legend_title(result.name()),
            line_type = index + 1,
        )?;
    }
    writeln!(script)
}

/// Writes the Medium, Avg and P99 labels of `result` starting at id `first`
/// and returns the next free id.
fn write_labels(
    script: &mut String,
    settings: &PlotSettings,
    result: &FileStats,
    first: usize,
) -> Result<usize, fmt::Error> {
    let format = &settings.format;
    let fraction = result.mean_fraction().unwrap_or_else(|| {
        warn!(
            input = result.name(),
            "mean is not reached before the P99 rank; placing the Avg label at the top"
        );
        1.0
    });
    writeln!(
        script,
        "set label {first} \"Medium\" at {},0.5 {POINT_STYLE}",
        format.format(result.median_value()),
    )?;
    writeln!(
        script,
        "set label {} \"Avg\" at {},{fraction:.2} {POINT_STYLE}",
        first + 1,
        format.format(SampleValue::Float(result.mean())),
    )?;
    writeln!(
        script,
        "set label {} \"P99\" at {},0.99 {POINT_STYLE}",
        first + 2,
        format.format(result.p99_value()),
    )?;
    Ok(first + 3)
}
