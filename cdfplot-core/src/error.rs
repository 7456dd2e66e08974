//! Error types for the cdfplot core library.
//!
//! [`FileError`] covers failures that drop a single input file from the run;
//! [`CdfError`] covers failures of the run as a whole. Both expose stable
//! machine-readable codes.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::number_format::PatternError;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A failure that aborts processing of one input file.
///
/// The file is dropped from the run; sibling files are unaffected.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FileError {
    /// Reading the input or writing its sorted copy failed.
    #[error("i/o failure on `{path}`: {source}")]
    Io {
        /// File that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The file contained no rows.
    #[error("`{path}` contains no rows")]
    EmptyInput {
        /// File that was empty.
        path: PathBuf,
    },
    /// The target column of a row could not be parsed as a number.
    #[error("row {row}: illegal number `{token}`")]
    InvalidNumber {
        /// 1-based row index within the sorted file.
        row: usize,
        /// The offending token.
        token: String,
    },
    /// The sorted file ended before the requested percentile rank.
    #[error("sorted file ended at row {rows} before percentile rank {rank}")]
    Truncated {
        /// Rows actually read.
        rows: usize,
        /// Rank that was never reached.
        rank: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`FileError`] variants.
    enum FileErrorCode for FileError {
        /// Reading the input or writing its sorted copy failed.
        Io => Io { .. } => "FILE_IO",
        /// The file contained no rows.
        EmptyInput => EmptyInput { .. } => "FILE_EMPTY_INPUT",
        /// The target column of a row could not be parsed as a number.
        InvalidNumber => InvalidNumber { .. } => "FILE_INVALID_NUMBER",
        /// The sorted file ended before the requested percentile rank.
        Truncated => Truncated { .. } => "FILE_TRUNCATED",
    }
}

impl FileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error type produced when configuring or running [`crate::CdfPlot`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CdfError {
    /// Columns are 1-based.
    #[error("column must be at least 1 (got {got})")]
    InvalidColumn {
        /// The column supplied by the caller.
        got: usize,
    },
    /// The number pattern could not be compiled.
    #[error("invalid number pattern `{pattern}`: {error}")]
    InvalidPattern {
        /// Pattern as supplied by the caller.
        pattern: String,
        /// Reason the pattern was rejected.
        #[source]
        error: PatternError,
    },
    /// No input files were supplied.
    #[error("no input files given")]
    NoInputs,
    /// The input path has no file name to derive a sorted copy from.
    #[error("input `{path}` does not name a file")]
    InvalidInputPath {
        /// The offending input path.
        path: PathBuf,
    },
    /// Two inputs would write the same sorted copy.
    #[error("inputs `{first}` and `{second}` would both be sorted into `{sorted}`")]
    DuplicateSortedPath {
        /// Earlier input.
        first: PathBuf,
        /// Later input.
        second: PathBuf,
        /// Shared sorted path.
        sorted: PathBuf,
    },
    /// Every input failed, so there is nothing to plot.
    #[error("none of the {attempted} input file(s) produced a usable result")]
    NoUsableInputs {
        /// Number of files that were processed.
        attempted: usize,
    },
    /// Writing the plot script failed.
    #[error("could not write script to `{path}`: {source}")]
    WriteScript {
        /// Script path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`CdfError`] variants.
    enum CdfErrorCode for CdfError {
        /// Columns are 1-based.
        InvalidColumn => InvalidColumn { .. } => "CDF_INVALID_COLUMN",
        /// The number pattern could not be compiled.
        InvalidPattern => InvalidPattern { .. } => "CDF_INVALID_PATTERN",
        /// No input files were supplied.
        NoInputs => NoInputs => "CDF_NO_INPUTS",
        /// The input path has no file name.
        InvalidInputPath => InvalidInputPath { .. } => "CDF_INVALID_INPUT_PATH",
        /// Two inputs would write the same sorted copy.
        DuplicateSortedPath => DuplicateSortedPath { .. } => "CDF_DUPLICATE_SORTED_PATH",
        /// Every input failed.
        NoUsableInputs => NoUsableInputs { .. } => "CDF_NO_USABLE_INPUTS",
        /// Writing the plot script failed.
        WriteScript => WriteScript { .. } => "CDF_WRITE_SCRIPT",
    }
}

/// Convenient alias for results returned by the run-level API.
pub type Result<T> = core::result::Result<T, CdfError>;
