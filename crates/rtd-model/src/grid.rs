//! Row-major grid of untyped cells, the shape raw tables arrive in.

/// An extracted table before any repair: rows of string cells with no
/// guarantee of uniform width, header position, or cell typing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a grid from string literals, mainly for tests and fixtures.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Widest row width. Rows may be ragged until a repair pads them.
    pub fn n_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at (row, col), `None` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when every cell of the row is blank.
    pub fn row_is_blank(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|cells| cells.iter().all(|cell| cell.trim().is_empty()))
    }

    /// True when every cell of the column is blank or absent.
    pub fn col_is_blank(&self, col: usize) -> bool {
        self.rows
            .iter()
            .all(|row| row.get(col).is_none_or(|cell| cell.trim().is_empty()))
    }
}
