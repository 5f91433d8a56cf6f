use std::fmt::{Display, Formatter};

/// Why a piece of text could not be turned into a `Matrix`.
///
/// Row and column indices are zero-based; the `Display` impl reports them
/// one-based, the way an editor would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixParseError {
    /// The input contained no characters at all.
    EmptyInput,
    /// A line contained no tokens, so it cannot have a column count.
    EmptyRow { row: usize },
    /// The row's token count disagrees with the first row's.
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// The token is not a base-10 integer.
    InvalidToken {
        row: usize,
        column: usize,
        token: String,
    },
    /// The token is an integer, but not one that fits in an `i64`.
    OutOfRange {
        row: usize,
        column: usize,
        token: String,
    },
}

impl Display for MatrixParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixParseError::EmptyInput => f.write_str("input is empty"),
            MatrixParseError::EmptyRow { row } => {
                f.write_fmt(format_args!("row {} is empty", row + 1))
            }
            MatrixParseError::RaggedRows {
                row,
                expected,
                actual,
            } => f.write_fmt(format_args!(
                "row {} has {} columns, but row 1 has {}",
                row + 1,
                actual,
                expected
            )),
            MatrixParseError::InvalidToken { row, column, token } => f.write_fmt(format_args!(
                "row {}, column {}: {:?} is not an integer",
                row + 1,
                column + 1,
                token
            )),
            MatrixParseError::OutOfRange { row, column, token } => f.write_fmt(format_args!(
                "row {}, column {}: {} does not fit in a signed 64-bit integer",
                row + 1,
                column + 1,
                token
            )),
        }
    }
}

impl std::error::Error for MatrixParseError {}
