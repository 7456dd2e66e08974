//! Stable error codes.

use std::{io, path::PathBuf};

use cdfplot_core::{CdfError, CdfErrorCode, FileError, FileErrorCode, PatternError};
use rstest::rstest;

#[rstest]
#[case(
    FileError::Io { path: PathBuf::from("a.txt"), source: io::Error::other("boom") },
    FileErrorCode::Io,
    "FILE_IO",
)]
#[case(
    FileError::EmptyInput { path: PathBuf::from("a.txt") },
    FileErrorCode::EmptyInput,
    "FILE_EMPTY_INPUT",
)]
#[case(
    FileError::InvalidNumber { row: 3, token: "abc".to_owned() },
    FileErrorCode::InvalidNumber,
    "FILE_INVALID_NUMBER",
)]
#[case(FileError::Truncated { rows: 4, rank: 9 }, FileErrorCode::Truncated, "FILE_TRUNCATED")]
fn returns_expected_file_code(
    #[case] error: FileError,
    #[case] expected: FileErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
    assert_eq!(expected.to_string(), text);
}

#[rstest]
#[case(CdfError::InvalidColumn { got: 0 }, CdfErrorCode::InvalidColumn, "CDF_INVALID_COLUMN")]
#[case(
    CdfError::InvalidPattern {
        pattern: "%q".to_owned(),
        error: PatternError::UnsupportedConversion('q'),
    },
    CdfErrorCode::InvalidPattern,
    "CDF_INVALID_PATTERN",
)]
#[case(CdfError::NoInputs, CdfErrorCode::NoInputs, "CDF_NO_INPUTS")]
#[case(
    CdfError::InvalidInputPath { path: PathBuf::from("..") },
    CdfErrorCode::InvalidInputPath,
    "CDF_INVALID_INPUT_PATH",
)]
#[case(
    CdfError::DuplicateSortedPath {
        first: PathBuf::from("x/a.txt"),
        second: PathBuf::from("y/a.txt"),
        sorted: PathBuf::from("sorted_a.txt"),
    },
    CdfErrorCode::DuplicateSortedPath,
    "CDF_DUPLICATE_SORTED_PATH",
)]
#[case(
    CdfError::NoUsableInputs { attempted: 2 },
    CdfErrorCode::NoUsableInputs,
    "CDF_NO_USABLE_INPUTS",
)]
#[case(
    CdfError::WriteScript { path: PathBuf::from("fig.gnu"), source: io::Error::other("denied") },
    CdfErrorCode::WriteScript,
    "CDF_WRITE_SCRIPT",
)]
fn returns_expected_run_code(
    #[case] error: CdfError,
    #[case] expected: CdfErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
}

#[rstest]
fn invalid_number_message_names_row_and_token() {
    let error = FileError::InvalidNumber {
        row: 7,
        token: "1.2.3".to_owned(),
    };
    assert_eq!(error.to_string(), "row 7: illegal number `1.2.3`");
}
