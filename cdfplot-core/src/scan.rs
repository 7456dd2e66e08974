//! Percentile scan over a sorted data file.
//!
//! The scan makes two passes over the sorted copy: one streaming aggregate
//! for the row count and mean, then a single forward pass that picks the
//! median and P99 values at their ranks and the first row that reaches the
//! mean. The second pass stops at the P99 rank; rows past it are never read.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    num::NonZeroUsize,
    path::Path,
};

use tracing::{Span, field, instrument, warn};

use crate::{
    aggregate::ColumnAggregate, column::Column, error::FileError, result::ScanSummary,
    value::SampleValue,
};

/// Row ranks of the median and the 99th percentile in a sorted file.
///
/// Ranks are 1-based: `median = floor(rows / 2)` and
/// `p99 = floor(0.99 * rows)`, both clamped to `[1, rows]` so a single-row
/// file reports that row for both.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use cdfplot_core::PercentileRanks;
///
/// let ranks = PercentileRanks::for_rows(NonZeroUsize::new(10).expect("non-zero"));
/// assert_eq!((ranks.median().get(), ranks.p99().get()), (5, 9));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PercentileRanks {
    median: NonZeroUsize,
    p99: NonZeroUsize,
}

impl PercentileRanks {
    /// Computes the ranks for a file of `rows` rows.
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "percentile ranks are floored by definition"
    )]
    #[must_use]
    pub fn for_rows(rows: NonZeroUsize) -> Self {
        let total = rows.get();
        let median = total / 2;
        // floor(total * 99 / 100) without overflowing for huge counts.
        let p99 = total / 100 * 99 + total % 100 * 99 / 100;
        Self {
            median: NonZeroUsize::new(median).unwrap_or(NonZeroUsize::MIN),
            p99: NonZeroUsize::new(p99).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Rank of the median row.
    #[must_use]
    pub const fn median(&self) -> NonZeroUsize {
        self.median
    }

    /// Rank of the 99th percentile row; the scan stops here.
    #[must_use]
    pub const fn p99(&self) -> NonZeroUsize {
        self.p99
    }
}

/// Row count and optional statistics for one sorted file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanReport {
    total_rows: NonZeroUsize,
    summary: Option<ScanSummary>,
}

impl ScanReport {
    /// Number of rows in the file.
    #[must_use]
    pub const fn total_rows(&self) -> NonZeroUsize {
        self.total_rows
    }

    /// Statistics, present when metadata was requested.
    #[must_use]
    pub const fn summary(&self) -> Option<&ScanSummary> {
        self.summary.as_ref()
    }

    /// Consumes the report, returning its parts.
    #[must_use]
    pub const fn into_parts(self) -> (NonZeroUsize, Option<ScanSummary>) {
        (self.total_rows, self.summary)
    }
}

/// Counts newline-terminated rows in `reader`, like `wc -l`.
///
/// # Errors
/// Returns any I/O error raised while reading.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use cdfplot_core::count_rows;
///
/// assert_eq!(count_rows(Cursor::new("1\n2\n3\n"))?, 3);
/// assert_eq!(count_rows(Cursor::new("1\n2"))?, 1);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn count_rows<R: Read>(reader: R) -> std::io::Result<usize> {
    let mut buffered = BufReader::new(reader);
    let mut rows = 0;
    loop {
        let chunk = buffered.fill_buf()?;
        if chunk.is_empty() {
            return Ok(rows);
        }
        rows += chunk.iter().filter(|&&byte| byte == b'\n').count();
        let consumed = chunk.len();
        buffered.consume(consumed);
    }
}

/// Computes per-file statistics over sorted data.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use cdfplot_core::{Column, ColumnAggregate, SampleValue, StatisticsScanner};
///
/// let text: String = (1..=10).map(|value| format!("{value}\n")).collect();
/// let aggregate = ColumnAggregate::from_reader(Cursor::new(&text), Column::FIRST)?;
/// let scanner = StatisticsScanner::new(Column::FIRST, true);
/// let summary = scanner.summarise(Cursor::new(&text), &aggregate, "demo")?;
/// assert_eq!(summary.mean(), 5.5);
/// assert_eq!(summary.median(), SampleValue::Int(5));
/// assert_eq!(summary.p99(), SampleValue::Int(9));
/// assert_eq!(summary.mean_row().map(|row| row.get()), Some(6));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatisticsScanner {
    column: Column,
    show_meta: bool,
}

impl StatisticsScanner {
    /// Creates a scanner for `column`; `show_meta` enables mean, median and
    /// P99.
    #[must_use]
    pub const fn new(column: Column, show_meta: bool) -> Self {
        Self { column, show_meta }
    }

    /// Column the scanner reads.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Whether mean, median and P99 are computed.
    #[must_use]
    pub const fn show_meta(&self) -> bool {
        self.show_meta
    }

    /// Scans the sorted file at `path`.
    ///
    /// Without metadata only the row count is taken. With metadata the file
    /// is aggregated once and then scanned up to the P99 rank.
    ///
    /// # Errors
    /// Returns [`FileError::EmptyInput`] for a file without rows,
    /// [`FileError::InvalidNumber`] when a token before the P99 rank does not
    /// parse, and [`FileError::Io`] when the file cannot be read.
    #[instrument(
        name = "cdf.scan",
        skip_all,
        fields(path = %path.display(), show_meta = self.show_meta, rows = field::Empty),
    )]
    pub fn scan_path(&self, path: &Path) -> Result<ScanReport, FileError> {
        let open = || File::open(path).map_err(|source| FileError::io(path, source));
        let label = path.display().to_string();

        if !self.show_meta {
            let rows = count_rows(open()?).map_err(|source| FileError::io(path, source))?;
            let total_rows = NonZeroUsize::new(rows).ok_or_else(|| FileError::EmptyInput {
                path: path.to_path_buf(),
            })?;
            Span::current().record("rows", rows);
            return Ok(ScanReport {
                total_rows,
                summary: None,
            });
        }

        let aggregate = ColumnAggregate::from_reader(BufReader::new(open()?), self.column)
            .map_err(|source| FileError::io(path, source))?;
        let total_rows =
            NonZeroUsize::new(aggregate.rows()).ok_or_else(|| FileError::EmptyInput {
                path: path.to_path_buf(),
            })?;
        Span::current().record("rows", aggregate.rows());
        let summary = self
            .summarise(BufReader::new(open()?), &aggregate, &label)
            .map_err(|error| match error {
                FileError::Io { source, .. } => FileError::io(path, source),
                other => other,
            })?;
        Ok(ScanReport {
            total_rows,
            summary: Some(summary),
        })
    }

    /// Finds the median, P99 and mean row in sorted `reader`, using the row
    /// count and mean already collected in `aggregate`.
    ///
    /// A row lacking the target column is logged as a warning and its whole
    /// trimmed text is parsed instead. `label` names the input in those
    /// warnings.
    ///
    /// # Errors
    /// Returns [`FileError::EmptyInput`] when `aggregate` saw no rows,
    /// [`FileError::InvalidNumber`] for a token that does not parse,
    /// [`FileError::Truncated`] when `reader` ends before the P99 rank, and
    /// [`FileError::Io`] for read failures.
    pub fn summarise<R: BufRead>(
        &self,
        reader: R,
        aggregate: &ColumnAggregate,
        label: &str,
    ) -> Result<ScanSummary, FileError> {
        let (Some(total_rows), Some(mean)) =
            (NonZeroUsize::new(aggregate.rows()), aggregate.mean())
        else {
            return Err(FileError::EmptyInput { path: label.into() });
        };
        let ranks = PercentileRanks::for_rows(total_rows);

        let mut median = None;
        let mut mean_row = None;
        let mut rows_read = 0;
        for (index, line) in reader.lines().enumerate() {
            let row = index + 1;
            rows_read = row;
            let text = line.map_err(|source| FileError::io(label, source))?;
            let value = self.parse_row(text.trim(), row, label)?;

            if row == ranks.median().get() {
                median = Some(value);
            }
            if mean_row.is_none() && value.as_f64() >= mean {
                mean_row = NonZeroUsize::new(row);
            }
            if row == ranks.p99().get() {
                let Some(median_value) = median else {
                    break;
                };
                return Ok(ScanSummary::new(mean, mean_row, median_value, value));
            }
        }

        Err(FileError::Truncated {
            rows: rows_read,
            rank: ranks.p99().get(),
        })
    }

    fn parse_row(&self, line: &str, row: usize, label: &str) -> Result<SampleValue, FileError> {
        let token = self.column.token(line).unwrap_or_else(|| {
            warn!(
                input = label,
                row,
                column = self.column.get(),
                line,
                "row has no such column; parsing the whole line"
            );
            line
        });
        SampleValue::parse(token).ok_or_else(|| FileError::InvalidNumber {
            row,
            token: token.to_owned(),
        })
    }
}
