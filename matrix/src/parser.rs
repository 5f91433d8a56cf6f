use nom::{
    bytes::complete::{take_till1, take_while},
    character::complete::{digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    multi::many0,
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::{matrix::Matrix, parse_error::MatrixParseError};

/// Whitespace within a row. Newlines are not in this set: they separate rows.
fn is_separator(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

fn gap(input: &str) -> IResult<&str, &str> {
    take_while(is_separator)(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace)(input)
}

/// The tokens of a single line, with leading and trailing whitespace discarded.
fn tokens(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(gap, many0(terminated(token, gap)))(input)
}

fn integer_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

fn integer(token: &str, row: usize, column: usize) -> Result<i64, MatrixParseError> {
    if all_consuming(integer_literal)(token).is_err() {
        return Err(MatrixParseError::InvalidToken {
            row,
            column,
            token: token.to_owned(),
        });
    }
    // The shape is already known to be valid, so overflow is the only way left to fail.
    token
        .parse::<i64>()
        .map_err(|_| MatrixParseError::OutOfRange {
            row,
            column,
            token: token.to_owned(),
        })
}

/// The tokens of one row. Anything the tokenizer leaves unconsumed is reported as
/// an invalid token rather than dropped.
fn row_tokens(line: &str, row: usize) -> Result<Vec<&str>, MatrixParseError> {
    all_consuming(tokens)(line)
        .map(|(_, found)| found)
        .map_err(|e| {
            let rest = match e {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
                nom::Err::Incomplete(_) => line,
            };
            MatrixParseError::InvalidToken {
                row,
                column: line[..line.len() - rest.len()].split_whitespace().count(),
                token: rest.trim().to_owned(),
            }
        })
}

/// Converts one row onto the end of `elements`, returning how many columns it had.
fn push_row(elements: &mut Vec<i64>, line: &str, row: usize) -> Result<usize, MatrixParseError> {
    let found = row_tokens(line, row)?;
    if found.is_empty() {
        return Err(MatrixParseError::EmptyRow { row });
    }
    for (column, token) in found.iter().enumerate() {
        elements.push(integer(token, row, column)?);
    }
    Ok(found.len())
}

/// Parse whitespace-separated integers, one row per line, into a rectangular matrix.
///
/// Every `'\n'` starts a new row, so a trailing newline produces an empty final row and
/// is rejected. The first problem found scanning top to bottom, left to right is returned.
pub fn matrix(text: &str) -> Result<Matrix, MatrixParseError> {
    if text.is_empty() {
        return Err(MatrixParseError::EmptyInput);
    }

    let (first_line, later_lines) = match text.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (text, None),
    };

    let mut elements = Vec::new();
    let col_count = push_row(&mut elements, first_line, 0)?;

    let later_rows = later_lines.into_iter().flat_map(|rest| rest.split('\n'));
    for (row, line) in (1..).zip(later_rows) {
        let actual = push_row(&mut elements, line, row)?;
        if actual != col_count {
            return Err(MatrixParseError::RaggedRows {
                row,
                expected: col_count,
                actual,
            });
        }
    }

    Ok(Matrix::of_row_major(elements, col_count))
}

#[cfg(test)]
mod test_parser {
    use crate::parse_error::MatrixParseError;
    use crate::parser::{integer, matrix, row_tokens, tokens};

    #[test]
    fn tokens_ignore_surrounding_whitespace() {
        let (remaining, parsed) = tokens("  8 \t 7   6\r").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(parsed, vec!["8", "7", "6"]);
    }

    #[test]
    fn tokens_of_blank_line() {
        let (remaining, parsed) = tokens(" \t ").unwrap();
        assert_eq!(remaining, "");
        assert!(parsed.is_empty());
    }

    #[test]
    fn integer_accepts_signs() {
        assert_eq!(integer("-12", 0, 0), Ok(-12));
        assert_eq!(integer("+12", 0, 0), Ok(12));
        assert_eq!(integer("007", 0, 0), Ok(7));
    }

    #[test]
    fn integer_rejects_malformed() {
        for bad in ["2.7", "cat", "-", "+", "1e5", "12a", "--1", "0x10", "1,000"] {
            assert_eq!(
                integer(bad, 3, 4),
                Err(MatrixParseError::InvalidToken {
                    row: 3,
                    column: 4,
                    token: bad.to_owned()
                }),
                "{bad}"
            );
        }
    }

    #[test]
    fn integer_limits() {
        assert_eq!(integer("9223372036854775807", 0, 0), Ok(i64::MAX));
        assert_eq!(integer("-9223372036854775808", 0, 0), Ok(i64::MIN));
        assert!(matches!(
            integer("-9223372036854775809", 0, 0),
            Err(MatrixParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn crlf_lines() {
        let m = matrix("1 2\r\n3 4").unwrap();
        assert_eq!(m.rows(), vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn invalid_token_reported_before_ragged_row() {
        assert_eq!(
            matrix("1 2\n3 x 5"),
            Err(MatrixParseError::InvalidToken {
                row: 1,
                column: 1,
                token: "x".to_owned()
            })
        );
    }

    #[test]
    fn first_error_wins() {
        assert_eq!(
            matrix("1 2\n\n3\ncat"),
            Err(MatrixParseError::EmptyRow { row: 1 })
        );
    }

    #[test]
    fn row_tokens_of_blank_and_padded_lines() {
        assert_eq!(row_tokens("", 0), Ok(vec![]));
        assert_eq!(row_tokens(" \t\r", 4), Ok(vec![]));
        assert_eq!(row_tokens("\u{a0}1\u{a0} 2 ", 0), Ok(vec!["1", "2"]));
    }

    #[test]
    fn blank_rows_are_never_swallowed() {
        assert_eq!(matrix("\n"), Err(MatrixParseError::EmptyRow { row: 0 }));
        assert_eq!(
            matrix("1\n\r\n2"),
            Err(MatrixParseError::EmptyRow { row: 1 })
        );
        assert_eq!(
            matrix("1 2\n3 4\n"),
            Err(MatrixParseError::EmptyRow { row: 2 })
        );
    }

    #[test]
    fn unicode_edges() {
        let m = matrix("1\u{a0}2\n3 4").unwrap();
        assert_eq!(m.rows(), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(
            matrix("\u{ff11}"),
            Err(MatrixParseError::InvalidToken {
                row: 0,
                column: 0,
                token: "\u{ff11}".to_owned()
            })
        );
    }

    #[test]
    fn overflow_in_first_token() {
        assert_eq!(
            matrix("99999999999999999999 1\n2 3"),
            Err(MatrixParseError::OutOfRange {
                row: 0,
                column: 0,
                token: "99999999999999999999".to_owned()
            })
        );
    }
}
