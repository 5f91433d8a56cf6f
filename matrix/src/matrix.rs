use std::fmt::{Display, Formatter};
use std::str::FromStr;

use arbitrary::{Arbitrary, Unstructured};
use serde::{Serialize, Serializer};

use crate::{parse_error::MatrixParseError, parser};

/// A rectangular grid of signed integers with at least one row and one column.
///
/// There is no way to mutate a `Matrix`; `rows` and `cols` hand out fresh copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    /// Row-major, `row_count * col_count` long.
    elements: Vec<i64>,
    row_count: usize,
    col_count: usize,
}

impl Matrix {
    /// `col_count` must be nonzero and must divide `elements.len()`, which must be nonzero.
    pub(crate) fn of_row_major(elements: Vec<i64>, col_count: usize) -> Matrix {
        debug_assert!(col_count > 0 && !elements.is_empty() && elements.len() % col_count == 0);
        Matrix {
            row_count: elements.len() / col_count,
            elements,
            col_count,
        }
    }

    pub fn parse(text: &str) -> Result<Matrix, MatrixParseError> {
        parser::matrix(text)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.row_count && col < self.col_count {
            Some(self.elements[row * self.col_count + col])
        } else {
            None
        }
    }

    fn row_slices(&self) -> std::slice::ChunksExact<'_, i64> {
        self.elements.chunks_exact(self.col_count)
    }

    fn column(&self, col: usize) -> impl Iterator<Item = i64> + '_ {
        self.elements
            .iter()
            .skip(col)
            .step_by(self.col_count)
            .copied()
    }

    /// The rows, top to bottom. The result shares nothing with `self`.
    pub fn rows(&self) -> Vec<Vec<i64>> {
        self.row_slices().map(<[i64]>::to_vec).collect()
    }

    /// The columns, left to right: `cols()[c][r] == rows()[r][c]`.
    /// The result shares nothing with `self`.
    pub fn cols(&self) -> Vec<Vec<i64>> {
        (0..self.col_count)
            .map(|col| self.column(col).collect())
            .collect()
    }
}

impl FromStr for Matrix {
    type Err = MatrixParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::matrix(s)
    }
}

/// Renders in the same format `Matrix::parse` reads, without a trailing newline.
impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.row_slices().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                f.write_fmt(format_args!("{}", value))?;
            }
        }
        std::fmt::Result::Ok(())
    }
}

/// Serializes as the row view.
impl Serialize for Matrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.row_slices())
    }
}

const MAX_ARBITRARY_DIMENSION: usize = 16;

/// Draws the text of a well-formed matrix and hands it to the parser, so arbitrary
/// matrices are built the same way as every other one.
impl<'a> Arbitrary<'a> for Matrix {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let row_count = u.int_in_range(1..=MAX_ARBITRARY_DIMENSION)?;
        let col_count = u.int_in_range(1..=MAX_ARBITRARY_DIMENSION)?;
        let mut text = String::new();
        for row in 0..row_count {
            if row > 0 {
                text.push('\n');
            }
            for col in 0..col_count {
                if col > 0 {
                    text.push(' ');
                }
                text.push_str(&i64::arbitrary(u)?.to_string());
            }
        }
        parser::matrix(&text).map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}
