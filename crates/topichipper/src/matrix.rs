//! # Token Matrices
//!
//! A [`TokenMatrix<T>`] is a dense, row-major `(n_docs, max_length)` array of
//! token ids; one row per document. Documents shorter than `max_length` are
//! padded with a sentinel id; longer documents are truncated.
//!
//! A [`TokenMatrixView<T>`] borrows a contiguous row range of a matrix;
//! it is what the chunking machinery hands to a model.

use core::ops::Range;

use crate::errors::{CorpusError, CorpusResult};
use crate::types::TokenType;

/// A dense row-major token id matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatrix<T: TokenType> {
    n_rows: usize,
    n_cols: usize,
    data: Vec<T>,
}

impl<T: TokenType> TokenMatrix<T> {
    /// Build a matrix from row-major data.
    ///
    /// ## Arguments
    /// * `n_rows` - the number of rows (documents).
    /// * `n_cols` - the number of columns (max document length).
    /// * `data` - row-major data of length `n_rows * n_cols`.
    ///
    /// ## Returns
    /// The matrix, or a shape mismatch error.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        data: Vec<T>,
    ) -> CorpusResult<Self> {
        if data.len() != n_rows * n_cols {
            return Err(CorpusError::shape_mismatch(
                (n_rows, n_cols),
                format!("{} elements", data.len()),
            ));
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Build a matrix where every entry is `value`.
    pub fn filled(
        n_rows: usize,
        n_cols: usize,
        value: T,
    ) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![value; n_rows * n_cols],
        }
    }

    /// Build a matrix from ragged rows.
    ///
    /// Rows shorter than `max_length` are padded with `pad`;
    /// longer rows are truncated.
    pub fn from_rows<I, R>(
        rows: I,
        max_length: usize,
        pad: T,
    ) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[T]>,
    {
        let mut data = Vec::new();
        let mut n_rows = 0;
        for row in rows {
            let row = row.as_ref();
            let keep = row.len().min(max_length);
            data.extend_from_slice(&row[..keep]);
            data.resize(data.len() + (max_length - keep), pad);
            n_rows += 1;
        }
        Self {
            n_rows,
            n_cols: max_length,
            data,
        }
    }

    /// The number of rows (documents).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// The number of columns (max document length).
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// The `(n_rows, n_cols)` shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Returns true if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// The row-major data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix, returning the row-major data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrow the whole matrix as a view.
    pub fn view(&self) -> TokenMatrixView<'_, T> {
        TokenMatrixView {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            data: &self.data,
        }
    }

    /// Borrow a row.
    ///
    /// ## Panics
    /// Panics if `idx >= n_rows`.
    pub fn row(
        &self,
        idx: usize,
    ) -> &[T] {
        self.view().row(idx)
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.n_rows).map(move |idx| self.row(idx))
    }

    /// Borrow a contiguous row range as a view.
    ///
    /// ## Panics
    /// Panics if the range is out of bounds.
    pub fn slice_rows(
        &self,
        rows: Range<usize>,
    ) -> TokenMatrixView<'_, T> {
        self.view().slice_rows(rows)
    }

    /// Build a new matrix of the same shape by mapping every entry.
    pub fn map<F>(
        &self,
        f: F,
    ) -> Self
    where
        F: FnMut(T) -> T,
    {
        self.view().map(f)
    }

    /// Build a new matrix of the same shape by fallibly mapping every entry.
    pub fn try_map<F>(
        &self,
        f: F,
    ) -> CorpusResult<Self>
    where
        F: FnMut(T) -> CorpusResult<T>,
    {
        let data = self
            .data
            .iter()
            .copied()
            .map(f)
            .collect::<CorpusResult<Vec<T>>>()?;
        Ok(Self {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            data,
        })
    }

    /// The largest entry, if any.
    pub fn max_token(&self) -> Option<T> {
        self.data.iter().copied().max()
    }

    /// Count the entries not equal to `pad`.
    pub fn count_non_pad(
        &self,
        pad: T,
    ) -> usize {
        self.view().count_non_pad(pad)
    }
}

/// A borrowed contiguous row range of a [`TokenMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatrixView<'a, T: TokenType> {
    n_rows: usize,
    n_cols: usize,
    data: &'a [T],
}

impl<'a, T: TokenType> TokenMatrixView<'a, T> {
    /// The number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// The number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// The `(n_rows, n_cols)` shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Returns true if the view has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// The row-major data.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Borrow a row.
    ///
    /// ## Panics
    /// Panics if `idx >= n_rows`.
    pub fn row(
        &self,
        idx: usize,
    ) -> &'a [T] {
        assert!(idx < self.n_rows, "row {idx} out of bounds ({})", self.n_rows);
        &self.data[idx * self.n_cols..(idx + 1) * self.n_cols]
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + use<'a, T> {
        let view = *self;
        (0..view.n_rows).map(move |idx| view.row(idx))
    }

    /// Borrow a contiguous sub-range of rows.
    ///
    /// ## Panics
    /// Panics if the range is out of bounds.
    pub fn slice_rows(
        &self,
        rows: Range<usize>,
    ) -> TokenMatrixView<'a, T> {
        assert!(
            rows.start <= rows.end && rows.end <= self.n_rows,
            "row range {rows:?} out of bounds ({})",
            self.n_rows
        );
        TokenMatrixView {
            n_rows: rows.len(),
            n_cols: self.n_cols,
            data: &self.data[rows.start * self.n_cols..rows.end * self.n_cols],
        }
    }

    /// Build a new matrix of the same shape by mapping every entry.
    pub fn map<F>(
        &self,
        f: F,
    ) -> TokenMatrix<T>
    where
        F: FnMut(T) -> T,
    {
        TokenMatrix {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Count the entries not equal to `pad`.
    pub fn count_non_pad(
        &self,
        pad: T,
    ) -> usize {
        self.data.iter().filter(|&&t| t != pad).count()
    }

    /// Copy the view into an owned matrix.
    pub fn to_matrix(&self) -> TokenMatrix<T> {
        self.map(|t| t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pads_and_truncates() {
        let m: TokenMatrix<u32> =
            TokenMatrix::from_rows(vec![vec![1, 2, 3, 4], vec![5], vec![]], 3, 0);

        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.row(0), &[1, 2, 3]);
        assert_eq!(m.row(1), &[5, 0, 0]);
        assert_eq!(m.row(2), &[0, 0, 0]);
        assert_eq!(m.count_non_pad(0), 4);
        assert_eq!(m.max_token(), Some(5));
    }

    #[test]
    fn test_new_checks_shape() {
        assert!(TokenMatrix::<u32>::new(2, 2, vec![1, 2, 3, 4]).is_ok());
        assert!(matches!(
            TokenMatrix::<u32>::new(2, 2, vec![1, 2, 3]),
            Err(CorpusError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_slice_rows() {
        let m: TokenMatrix<u16> = TokenMatrix::from_rows([[1, 2], [3, 4], [5, 6]], 2, 0);

        let view = m.slice_rows(1..3);
        assert_eq!(view.shape(), (2, 2));
        assert_eq!(view.rows().collect::<Vec<_>>(), vec![&[3, 4], &[5, 6]]);
        assert_eq!(view.slice_rows(1..2).as_slice(), &[5, 6]);

        let empty = m.slice_rows(3..3);
        assert!(empty.is_empty());
        assert_eq!(empty.as_slice(), &[] as &[u16]);

        assert_eq!(view.to_matrix().as_slice(), &[3, 4, 5, 6]);
    }

    #[test]
    fn test_map_preserves_shape() {
        let m: TokenMatrix<u32> = TokenMatrix::filled(2, 3, 7);
        let doubled = m.map(|t| t * 2);
        assert_eq!(doubled.shape(), (2, 3));
        assert!(doubled.as_slice().iter().all(|&t| t == 14));
        // input untouched
        assert!(m.as_slice().iter().all(|&t| t == 7));
    }

    #[test]
    #[should_panic]
    fn test_slice_rows_out_of_bounds() {
        let m: TokenMatrix<u32> = TokenMatrix::filled(2, 2, 0);
        let _ = m.slice_rows(1..3);
    }
}
