//! Single-pass row count and column mean.

use std::io::BufRead;

use crate::{column::Column, value::SampleValue};

/// Running count and sum over one column.
///
/// Aggregation is lenient: a missing or non-numeric token adds zero to the sum
/// but the row is still counted. Strict validation is left to the percentile
/// scan, which stops at the first bad token it meets.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use cdfplot_core::{Column, ColumnAggregate};
///
/// let aggregate = ColumnAggregate::from_reader(Cursor::new("1\n2\n6\n"), Column::FIRST)?;
/// assert_eq!(aggregate.rows(), 3);
/// assert_eq!(aggregate.mean(), Some(3.0));
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnAggregate {
    rows: usize,
    sum: f64,
}

impl ColumnAggregate {
    /// Creates an empty aggregate.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: 0, sum: 0.0 }
    }

    /// Streams every line of `reader` into a new aggregate.
    ///
    /// # Errors
    /// Returns any I/O error raised while reading lines.
    pub fn from_reader<R: BufRead>(reader: R, column: Column) -> std::io::Result<Self> {
        let mut aggregate = Self::new();
        for line in reader.lines() {
            aggregate.push(&line?, column);
        }
        Ok(aggregate)
    }

    /// Adds one row.
    #[expect(
        clippy::float_arithmetic,
        reason = "the running sum is accumulated in floating point"
    )]
    pub fn push(&mut self, line: &str, column: Column) {
        let value = column
            .token(line)
            .and_then(SampleValue::parse)
            .map_or(0.0, SampleValue::as_f64);
        self.rows += 1;
        self.sum += value;
    }

    /// Number of rows seen so far.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Sum of the column over all rows.
    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.sum
    }

    /// Arithmetic mean, or `None` before the first row.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "the mean is a floating-point quotient of sum and row count"
    )]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.rows > 0).then(|| self.sum / self.rows as f64)
    }
}
