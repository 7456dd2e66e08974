//! Synthetic latency-style data rows.
//!
//! Rows hold `columns` whitespace-separated values. The first column is an
//! integer latency with a long tail, the others are floats, so both sample
//! kinds go through the parser.

use std::{fs, io, path::Path};

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic row generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested row count was zero.
    #[error("row count must be greater than zero")]
    ZeroRows,
    /// The requested column count was zero.
    #[error("column count must be greater than zero")]
    ZeroColumns,
}

/// Configuration for synthetic row generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of rows to generate.
    pub row_count: usize,
    /// Values per row.
    pub columns: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Unsorted rows generated from a seeded RNG.
///
/// # Examples
///
/// ```
/// use cdfplot_benches::source::{SyntheticConfig, SyntheticRows};
///
/// let config = SyntheticConfig { row_count: 8, columns: 3, seed: 7 };
/// let rows = SyntheticRows::generate(&config).expect("valid config");
/// assert_eq!(rows.rows().len(), 8);
/// assert!(rows.rows().iter().all(|row| row.split_whitespace().count() == 3));
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticRows {
    rows: Vec<String>,
}

impl SyntheticRows {
    /// Generates rows eagerly from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::ZeroRows`] or
    /// [`SyntheticError::ZeroColumns`] for an empty shape.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.row_count == 0 {
            return Err(SyntheticError::ZeroRows);
        }
        if config.columns == 0 {
            return Err(SyntheticError::ZeroColumns);
        }
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let rows = (0..config.row_count)
            .map(|_| {
                let mut row = latency(&mut rng).to_string();
                for _ in 1..config.columns {
                    let value: f64 = rng.gen_range(0.0..1_000.0);
                    row.push_str(&format!(" {value:.3}"));
                }
                row
            })
            .collect();
        Ok(Self { rows })
    }

    /// The generated rows.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Consumes the generator, yielding the rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }

    /// Writes the rows to `path`, one per line.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut text = self.rows.join("\n");
        text.push('\n');
        fs::write(path, text)
    }
}

/// Mostly small values with one row in fifty drawn from a much wider range.
fn latency(rng: &mut SmallRng) -> u64 {
    if rng.gen_ratio(1, 50) {
        rng.gen_range(10_000..1_000_000)
    } else {
        rng.gen_range(50..5_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn config(row_count: usize, columns: usize) -> SyntheticConfig {
        SyntheticConfig {
            row_count,
            columns,
            seed: 42,
        }
    }

    #[rstest]
    #[case(0, 1, SyntheticError::ZeroRows)]
    #[case(1, 0, SyntheticError::ZeroColumns)]
    fn empty_shapes_are_rejected(
        #[case] rows: usize,
        #[case] columns: usize,
        #[case] expected: SyntheticError,
    ) {
        let err = SyntheticRows::generate(&config(rows, columns)).expect_err("shape is empty");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn generation_is_seeded() {
        let first = SyntheticRows::generate(&config(64, 2)).expect("valid config");
        let second = SyntheticRows::generate(&config(64, 2)).expect("valid config");
        assert_eq!(first.rows(), second.rows());
    }

    #[rstest]
    fn first_column_is_an_integer() {
        let rows = SyntheticRows::generate(&config(32, 2)).expect("valid config");
        assert!(rows.rows().iter().all(|row| {
            row.split_whitespace()
                .next()
                .is_some_and(|token| token.parse::<u64>().is_ok())
        }));
    }
}
