//! In-process numeric sort of data rows.
//!
//! Orders rows the way `sort -n -k <column>` does: the key is the leading
//! numeric prefix of the selected field, rows without one sort as zero, and
//! equal keys fall back to a byte-wise comparison of the whole line.

use std::{
    cmp::Ordering,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use tracing::{debug, instrument};

use crate::{column::Column, error::FileError};

/// Returns the numeric sort key of `field`.
///
/// Leading whitespace is skipped, then an optional `-`, digits and an optional
/// fractional part are taken. Anything else, including a missing field, is
/// zero.
///
/// # Examples
/// ```
/// use cdfplot_core::numeric_key;
///
/// assert_eq!(numeric_key(Some("12.5ms")), 12.5);
/// assert_eq!(numeric_key(Some("-3")), -3.0);
/// assert_eq!(numeric_key(Some("n/a")), 0.0);
/// assert_eq!(numeric_key(None), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "adding 0.0 folds negative zero into zero"
)]
#[must_use]
pub fn numeric_key(field: Option<&str>) -> f64 {
    let Some(raw) = field else {
        return 0.0;
    };
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    let has_digits = text
        .get(digits_start..end)
        .is_some_and(|digits| digits.bytes().any(|byte| byte.is_ascii_digit()));
    if !has_digits {
        return 0.0;
    }
    text.get(..end)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .map_or(0.0, |key| key + 0.0)
}

fn compare_rows(left: &(f64, String), right: &(f64, String)) -> Ordering {
    left.0
        .total_cmp(&right.0)
        .then_with(|| left.1.as_bytes().cmp(right.1.as_bytes()))
}

/// Sorts `rows` ascending by the numeric key of `column`.
///
/// # Examples
/// ```
/// use cdfplot_core::{Column, sort_rows};
///
/// let rows = vec!["10".to_owned(), "9".to_owned(), "x".to_owned()];
/// assert_eq!(sort_rows(rows, Column::FIRST), ["x", "9", "10"]);
/// ```
#[must_use]
pub fn sort_rows(rows: Vec<String>, column: Column) -> Vec<String> {
    let mut keyed: Vec<(f64, String)> = rows
        .into_iter()
        .map(|row| (numeric_key(column.token(&row)), row))
        .collect();
    keyed.sort_by(compare_rows);
    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Sorts the rows of `input` by `column` and writes them to `output`.
///
/// Every row in the output is terminated by a newline. Returns the number of
/// rows written.
///
/// # Errors
/// Returns [`FileError::Io`] when the input cannot be read or the output
/// cannot be written.
#[instrument(
    name = "cdf.sort",
    skip_all,
    fields(input = %input.display(), output = %output.display(), column = column.get()),
)]
pub fn sort_file(input: &Path, output: &Path, column: Column) -> Result<usize, FileError> {
    let file = File::open(input).map_err(|source| FileError::io(input, source))?;
    let rows = BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| FileError::io(input, source))?;
    let sorted = sort_rows(rows, column);

    let out = File::create(output).map_err(|source| FileError::io(output, source))?;
    let mut writer = BufWriter::new(out);
    for row in &sorted {
        writeln!(writer, "{row}").map_err(|source| FileError::io(output, source))?;
    }
    writer
        .flush()
        .map_err(|source| FileError::io(output, source))?;
    debug!(rows = sorted.len(), "sorted copy written");
    Ok(sorted.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::{collection::vec, prelude::any, prop_assert, proptest};
    use rstest::rstest;

    fn owned(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|row| (*row).to_owned()).collect()
    }

    #[rstest]
    #[case(Some("42"), 42.0)]
    #[case(Some("  7.25 "), 7.25)]
    #[case(Some("3abc"), 3.0)]
    #[case(Some("-0"), 0.0)]
    #[case(Some(".5"), 0.5)]
    #[case(Some("5."), 5.0)]
    #[case(Some("-"), 0.0)]
    #[case(Some("."), 0.0)]
    #[case(Some("+4"), 0.0)]
    #[case(Some("1e3"), 1.0)]
    #[case(None, 0.0)]
    fn numeric_key_takes_leading_number(#[case] field: Option<&str>, #[case] expected: f64) {
        assert_eq!(numeric_key(field), expected);
    }

    #[rstest]
    #[case::numeric_not_lexical(&["10", "9", "100"], &["9", "10", "100"])]
    #[case::negatives_first(&["1", "-2", "0.5"], &["-2", "0.5", "1"])]
    #[case::non_numeric_as_zero(&["1", "abc", "-1"], &["-1", "abc", "1"])]
    #[case::ties_by_whole_line(&["1 b", "1 a", "01 c"], &["01 c", "1 a", "1 b"])]
    fn sort_rows_orders_numerically(#[case] input: &[&str], #[case] expected: &[&str]) {
        assert_eq!(sort_rows(owned(input), Column::FIRST), expected);
    }

    #[rstest]
    fn sort_rows_uses_selected_column() {
        let column = Column::new(2).expect("non-zero");
        let sorted = sort_rows(owned(&["a 3", "b 1", "c"]), column);
        assert_eq!(sorted, ["c", "b 1", "a 3"]);
    }

    #[rstest]
    fn sort_file_writes_terminated_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.txt");
        let output = dir.path().join("sorted_in.txt");
        std::fs::write(&input, "3\n1\r\n2").expect("write input");
        let rows = sort_file(&input, &output, Column::FIRST).expect("sort must succeed");
        assert_eq!(rows, 3);
        let written = std::fs::read_to_string(&output).expect("read output");
        assert_eq!(written, "1\n2\n3\n");
    }

    #[rstest]
    fn sort_file_reports_missing_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("absent.txt");
        let err = sort_file(&input, &dir.path().join("out"), Column::FIRST)
            .expect_err("missing input must fail");
        assert!(matches!(err, FileError::Io { path, .. } if path == input));
    }

    proptest! {
        #[test]
        fn sorted_keys_are_non_decreasing(values in vec(any::<i32>(), 0..64)) {
            let rows: Vec<String> = values.iter().map(ToString::to_string).collect();
            let sorted = sort_rows(rows, Column::FIRST);
            let keys: Vec<f64> = sorted.iter().map(|row| numeric_key(Some(row.as_str()))).collect();
            prop_assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
        }

        #[test]
        fn sorting_is_idempotent(values in vec(any::<i16>(), 0..64)) {
            let rows: Vec<String> = values.iter().map(|value| format!("{value} x")).collect();
            let once = sort_rows(rows, Column::FIRST);
            let twice = sort_rows(once.clone(), Column::FIRST);
            prop_assert!(once == twice);
        }
    }
}
