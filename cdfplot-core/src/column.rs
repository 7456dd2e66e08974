//! 1-based column selection over whitespace-separated rows.

use std::{fmt, num::NonZeroUsize};

/// A 1-based column index.
///
/// # Examples
/// ```
/// use cdfplot_core::Column;
///
/// let column = Column::new(2).expect("non-zero");
/// assert_eq!(column.token("10 20 30"), Some("20"));
/// assert_eq!(column.token("10"), None);
/// assert!(Column::new(0).is_none());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Column(NonZeroUsize);

impl Column {
    /// The first column.
    pub const FIRST: Self = Self(NonZeroUsize::MIN);

    /// Creates a column from a 1-based index, rejecting zero.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        match NonZeroUsize::new(index) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the 1-based index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Returns this column's token in `line`, splitting on runs of whitespace.
    #[must_use]
    pub fn token(self, line: &str) -> Option<&str> {
        line.split_whitespace().nth(self.0.get() - 1)
    }
}

impl Default for Column {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(1, "  4\t5  ", Some("4"))]
    #[case(2, "  4\t5  ", Some("5"))]
    #[case(3, "  4\t5  ", None)]
    #[case(1, "", None)]
    fn token_splits_on_whitespace(
        #[case] index: usize,
        #[case] line: &str,
        #[case] expected: Option<&str>,
    ) {
        let column = Column::new(index).expect("test columns are non-zero");
        assert_eq!(column.token(line), expected);
    }
}
