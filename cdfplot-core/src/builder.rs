//! Builder utilities for configuring a cdfplot run.
//!
//! [`CdfPlotBuilder`] collects the raw user configuration and validates it
//! before a [`CdfPlot`] exists, so a run never starts with a zero column or a
//! malformed number pattern.

use crate::{
    Result,
    column::Column,
    error::CdfError,
    number_format::NumberFormat,
    result::FileStats,
    script::{self, LegendPlacement, PlotSettings},
};

/// Configures and constructs [`CdfPlot`] instances.
///
/// # Examples
/// ```
/// use cdfplot_core::{CdfPlotBuilder, LegendPlacement};
///
/// let plot = CdfPlotBuilder::new()
///     .with_column(3)
///     .with_upper_legend(true)
///     .with_number_pattern(Some("%.2f".to_owned()))
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(plot.column().get(), 3);
/// assert_eq!(plot.legend(), LegendPlacement::TopOutside);
/// ```
#[derive(Clone, Debug)]
pub struct CdfPlotBuilder {
    column: usize,
    show_meta: bool,
    title: Option<String>,
    xlabel: Option<String>,
    logx: bool,
    legend: LegendPlacement,
    number_pattern: Option<String>,
}

impl Default for CdfPlotBuilder {
    fn default() -> Self {
        Self {
            column: Column::FIRST.get(),
            show_meta: false,
            title: None,
            xlabel: None,
            logx: false,
            legend: LegendPlacement::BottomRight,
            number_pattern: None,
        }
    }
}

impl CdfPlotBuilder {
    /// Creates a builder plotting column 1 with no metadata.
    ///
    /// # Examples
    /// ```
    /// use cdfplot_core::CdfPlotBuilder;
    ///
    /// let builder = CdfPlotBuilder::new();
    /// assert_eq!(builder.column(), 1);
    /// assert!(!builder.show_meta());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the 1-based column to sort and plot.
    #[must_use]
    pub const fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Returns the configured column.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Enables the mean, median and P99 computation and their labels.
    #[must_use]
    pub const fn with_show_meta(mut self, show_meta: bool) -> Self {
        self.show_meta = show_meta;
        self
    }

    /// Returns whether metadata is requested.
    #[must_use]
    pub const fn show_meta(&self) -> bool {
        self.show_meta
    }

    /// Sets the chart title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Sets the x-axis label.
    #[must_use]
    pub fn with_xlabel(mut self, xlabel: Option<String>) -> Self {
        self.xlabel = xlabel;
        self
    }

    /// Switches the x axis to a logarithmic scale.
    #[must_use]
    pub const fn with_logx(mut self, logx: bool) -> Self {
        self.logx = logx;
        self
    }

    /// Places the legend explicitly.
    #[must_use]
    pub const fn with_legend(mut self, legend: LegendPlacement) -> Self {
        self.legend = legend;
        self
    }

    /// Moves the legend above the chart when `upper` is set.
    ///
    /// # Examples
    /// ```
    /// use cdfplot_core::{CdfPlotBuilder, LegendPlacement};
    ///
    /// let builder = CdfPlotBuilder::new().with_upper_legend(false);
    /// assert_eq!(builder.legend(), LegendPlacement::BottomRight);
    /// ```
    #[must_use]
    pub const fn with_upper_legend(self, upper: bool) -> Self {
        self.with_legend(if upper {
            LegendPlacement::TopOutside
        } else {
            LegendPlacement::BottomRight
        })
    }

    /// Returns the configured legend placement.
    #[must_use]
    pub const fn legend(&self) -> LegendPlacement {
        self.legend
    }

    /// Sets the printf-style pattern used to render statistics.
    #[must_use]
    pub fn with_number_pattern(mut self, pattern: Option<String>) -> Self {
        self.number_pattern = pattern;
        self
    }

    /// Validates the configuration and constructs a [`CdfPlot`].
    ///
    /// # Errors
    /// Returns [`CdfError::InvalidColumn`] for column 0 and
    /// [`CdfError::InvalidPattern`] when the number pattern does not compile.
    ///
    /// # Examples
    /// ```
    /// use cdfplot_core::{CdfErrorCode, CdfPlotBuilder};
    ///
    /// let err = CdfPlotBuilder::new()
    ///     .with_column(0)
    ///     .build()
    ///     .expect_err("column 0 is rejected");
    /// assert_eq!(err.code(), CdfErrorCode::InvalidColumn);
    /// ```
    pub fn build(self) -> Result<CdfPlot> {
        let column =
            Column::new(self.column).ok_or(CdfError::InvalidColumn { got: self.column })?;
        let format = NumberFormat::from_pattern(self.number_pattern.as_deref()).map_err(|error| {
            CdfError::InvalidPattern {
                pattern: self.number_pattern.clone().unwrap_or_default(),
                error,
            }
        })?;
        Ok(CdfPlot {
            settings: PlotSettings {
                column,
                show_meta: self.show_meta,
                title: self.title,
                xlabel: self.xlabel,
                logx: self.logx,
                legend: self.legend,
                format,
            },
        })
    }
}

/// A validated run configuration.
///
/// Execute it with [`CdfPlot::run`].
#[derive(Clone, Debug)]
pub struct CdfPlot {
    pub(crate) settings: PlotSettings,
}

impl CdfPlot {
    /// Column sorted and plotted.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.settings.column
    }

    /// Whether metadata is computed and labelled.
    #[must_use]
    pub const fn show_meta(&self) -> bool {
        self.settings.show_meta
    }

    /// Chart title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.settings.title.as_deref()
    }

    /// X-axis label, if any.
    #[must_use]
    pub fn xlabel(&self) -> Option<&str> {
        self.settings.xlabel.as_deref()
    }

    /// Whether the x axis is logarithmic.
    #[must_use]
    pub const fn logx(&self) -> bool {
        self.settings.logx
    }

    /// Legend placement.
    #[must_use]
    pub const fn legend(&self) -> LegendPlacement {
        self.settings.legend
    }

    /// Formatting applied to statistics.
    #[must_use]
    pub const fn number_format(&self) -> &NumberFormat {
        &self.settings.format
    }

    /// Renders the gnuplot script for `results`, drawing into `output_name`.
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use cdfplot_core::{CdfPlotBuilder, FileStats};
    ///
    /// let plot = CdfPlotBuilder::new().build().expect("defaults are valid");
    /// let rows = NonZeroUsize::new(4).expect("non-zero");
    /// let stats = FileStats::new("a.txt", "sorted_a.txt", rows, None);
    /// let script = plot.render_script(&[stats], "fig.pdf");
    /// assert!(script.starts_with("# input: sorted_a.txt\n# output: fig.pdf\n"));
    /// ```
    #[must_use]
    pub fn render_script(&self, results: &[FileStats], output_name: &str) -> String {
        script::render(&self.settings, results, output_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{error::CdfErrorCode, number_format::PatternError, value::SampleValue};

    #[rstest]
    fn defaults_build() {
        let plot = CdfPlotBuilder::new().build().expect("defaults are valid");
        assert_eq!(plot.column(), Column::FIRST);
        assert!(!plot.show_meta());
        assert!(!plot.logx());
        assert_eq!(plot.title(), None);
        assert_eq!(plot.legend(), LegendPlacement::BottomRight);
        assert_eq!(plot.number_format(), &NumberFormat::Plain);
    }

    #[rstest]
    fn settings_are_carried_over() {
        let plot = CdfPlotBuilder::new()
            .with_column(2)
            .with_show_meta(true)
            .with_title(Some("t".to_owned()))
            .with_xlabel(Some("x".to_owned()))
            .with_logx(true)
            .with_upper_legend(true)
            .build()
            .expect("configuration is valid");
        assert_eq!(plot.column().get(), 2);
        assert!(plot.show_meta());
        assert_eq!(plot.title(), Some("t"));
        assert_eq!(plot.xlabel(), Some("x"));
        assert!(plot.logx());
        assert_eq!(plot.legend(), LegendPlacement::TopOutside);
    }

    #[rstest]
    fn zero_column_is_rejected() {
        let err = CdfPlotBuilder::new()
            .with_column(0)
            .build()
            .expect_err("column 0 must fail");
        assert!(matches!(err, CdfError::InvalidColumn { got: 0 }));
    }

    #[rstest]
    fn bad_pattern_is_rejected() {
        let err = CdfPlotBuilder::new()
            .with_number_pattern(Some("no conversion".to_owned()))
            .build()
            .expect_err("pattern without conversion must fail");
        assert_eq!(err.code(), CdfErrorCode::InvalidPattern);
        assert!(matches!(
            err,
            CdfError::InvalidPattern { ref pattern, error: PatternError::MissingConversion }
                if pattern == "no conversion"
        ));
    }

    #[rstest]
    fn oversized_precision_is_rejected_before_any_run() {
        let err = CdfPlotBuilder::new()
            .with_show_meta(true)
            .with_number_pattern(Some("%.70000f".to_owned()))
            .build()
            .expect_err("precision above the limit must fail");
        assert!(matches!(
            err,
            CdfError::InvalidPattern { error: PatternError::FieldTooLarge { limit }, .. }
                if limit == crate::number_format::MAX_PATTERN_FIELD
        ));
    }

    #[rstest]
    fn pattern_is_compiled() {
        let plot = CdfPlotBuilder::new()
            .with_number_pattern(Some("%.3f".to_owned()))
            .build()
            .expect("pattern is valid");
        assert_eq!(plot.number_format().format(SampleValue::Int(2)), "2.000");
    }
}
