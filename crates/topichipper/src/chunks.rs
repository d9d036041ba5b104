//! # Minibatch Chunking
//!
//! Deterministic partitioning of aligned arrays into contiguous row ranges.
//!
//! * [`ChunkRanges`] yields `Range<usize>` over any number of aligned arrays,
//!   given only their lengths.
//! * [`chunk_pairs`] yields aligned borrowed slices of two [`RowSliced`] containers.
//!
//! Chunks are in input order; the last chunk may be short and is never padded.
//! Neither iterator owns the data; build a fresh one per pass.
//!
//! ```rust
//! use topichipper::chunks::chunk_pairs;
//!
//! let a = [10, 20, 30, 40, 50];
//! let b = ['a', 'b', 'c', 'd', 'e'];
//!
//! let chunks: Vec<_> = chunk_pairs(2, &a[..], &b[..])?.collect();
//! assert_eq!(
//!     chunks,
//!     vec![
//!         (&[10, 20][..], &['a', 'b'][..]),
//!         (&[30, 40][..], &['c', 'd'][..]),
//!         (&[50][..], &['e'][..]),
//!     ]
//! );
//! # Ok::<(), topichipper::CorpusError>(())
//! ```

use core::iter::FusedIterator;
use core::ops::Range;

use crate::errors::{CorpusError, CorpusResult};
use crate::matrix::{TokenMatrix, TokenMatrixView};
use crate::types::TokenType;

/// A container which can be sliced along its leading (row) dimension.
pub trait RowSliced {
    /// The borrowed slice type.
    type Slice<'a>
    where
        Self: 'a;

    /// The length of the leading dimension.
    fn n_rows(&self) -> usize;

    /// Borrow a contiguous row range.
    fn slice_rows(
        &self,
        rows: Range<usize>,
    ) -> Self::Slice<'_>;
}

impl<T> RowSliced for [T] {
    type Slice<'a>
        = &'a [T]
    where
        Self: 'a;

    fn n_rows(&self) -> usize {
        self.len()
    }

    fn slice_rows(
        &self,
        rows: Range<usize>,
    ) -> Self::Slice<'_> {
        &self[rows]
    }
}

impl<T> RowSliced for Vec<T> {
    type Slice<'a>
        = &'a [T]
    where
        Self: 'a;

    fn n_rows(&self) -> usize {
        self.len()
    }

    fn slice_rows(
        &self,
        rows: Range<usize>,
    ) -> Self::Slice<'_> {
        &self[rows]
    }
}

impl<T: TokenType> RowSliced for TokenMatrix<T> {
    type Slice<'a>
        = TokenMatrixView<'a, T>
    where
        Self: 'a;

    fn n_rows(&self) -> usize {
        TokenMatrix::n_rows(self)
    }

    fn slice_rows(
        &self,
        rows: Range<usize>,
    ) -> Self::Slice<'_> {
        TokenMatrix::slice_rows(self, rows)
    }
}

impl<'v, T: TokenType> RowSliced for TokenMatrixView<'v, T> {
    type Slice<'a>
        = TokenMatrixView<'v, T>
    where
        Self: 'a;

    fn n_rows(&self) -> usize {
        TokenMatrixView::n_rows(self)
    }

    fn slice_rows(
        &self,
        rows: Range<usize>,
    ) -> Self::Slice<'_> {
        TokenMatrixView::slice_rows(self, rows)
    }
}

/// Iterator over contiguous `chunk_size` row ranges of aligned arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRanges {
    chunk_size: usize,
    n_rows: usize,
    next: usize,
}

impl ChunkRanges {
    /// Plan the chunks of aligned arrays.
    ///
    /// ## Arguments
    /// * `chunk_size` - rows per chunk; must be positive.
    /// * `lengths` - the leading length of every array; must be non-empty and all equal.
    ///
    /// ## Returns
    /// The range iterator; or an invalid-parameter or shape-mismatch error.
    pub fn new(
        chunk_size: usize,
        lengths: &[usize],
    ) -> CorpusResult<Self> {
        if chunk_size == 0 {
            return Err(CorpusError::invalid_parameter("chunk_size", chunk_size));
        }
        let Some((&n_rows, rest)) = lengths.split_first() else {
            return Err(CorpusError::invalid_parameter("lengths", "[]"));
        };
        if let Some(&bad) = rest.iter().find(|&&len| len != n_rows) {
            return Err(CorpusError::shape_mismatch(n_rows, bad));
        }
        Ok(Self {
            chunk_size,
            n_rows,
            next: 0,
        })
    }

    /// Rows per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The shared leading length.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// The total number of chunks, `ceil(n_rows / chunk_size)`.
    pub fn n_chunks(&self) -> usize {
        self.n_rows.div_ceil(self.chunk_size)
    }
}

impl Iterator for ChunkRanges {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.n_rows {
            return None;
        }
        let start = self.next;
        let end = (start + self.chunk_size).min(self.n_rows);
        self.next = end;
        Some(start..end)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.n_rows - self.next).div_ceil(self.chunk_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkRanges {}

impl FusedIterator for ChunkRanges {}

/// Iterator over aligned chunks of two [`RowSliced`] containers.
///
/// See [`chunk_pairs`].
pub struct ChunkPairs<'a, A, B>
where
    A: RowSliced + ?Sized,
    B: RowSliced + ?Sized,
{
    ranges: ChunkRanges,
    a: &'a A,
    b: &'a B,
}

impl<'a, A, B> Clone for ChunkPairs<'a, A, B>
where
    A: RowSliced + ?Sized,
    B: RowSliced + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            ranges: self.ranges.clone(),
            a: self.a,
            b: self.b,
        }
    }
}

impl<'a, A, B> ChunkPairs<'a, A, B>
where
    A: RowSliced + ?Sized,
    B: RowSliced + ?Sized,
{
    /// The underlying range plan.
    pub fn ranges(&self) -> &ChunkRanges {
        &self.ranges
    }
}

impl<'a, A, B> Iterator for ChunkPairs<'a, A, B>
where
    A: RowSliced + ?Sized,
    B: RowSliced + ?Sized,
{
    type Item = (A::Slice<'a>, B::Slice<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.ranges.next()?;
        Some((self.a.slice_rows(rows.clone()), self.b.slice_rows(rows)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ranges.size_hint()
    }
}

impl<'a, A, B> ExactSizeIterator for ChunkPairs<'a, A, B>
where
    A: RowSliced + ?Sized,
    B: RowSliced + ?Sized,
{
}

/// Chunk two aligned containers into `chunk_size` row slices.
///
/// ## Returns
/// The chunk iterator; or an invalid-parameter error for `chunk_size == 0`,
/// or a shape-mismatch error if the leading lengths differ.
pub fn chunk_pairs<'a, A, B>(
    chunk_size: usize,
    a: &'a A,
    b: &'a B,
) -> CorpusResult<ChunkPairs<'a, A, B>>
where
    A: RowSliced + ?Sized,
    B: RowSliced + ?Sized,
{
    let ranges = ChunkRanges::new(chunk_size, &[a.n_rows(), b.n_rows()])?;
    Ok(ChunkPairs { ranges, a, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_pairs_example() {
        let a = vec![10, 20, 30, 40, 50];
        let b = vec!['a', 'b', 'c', 'd', 'e'];

        let chunks: Vec<(&[i32], &[char])> = chunk_pairs(2, &a, &b).unwrap().collect();
        assert_eq!(
            chunks,
            vec![
                (&[10, 20][..], &['a', 'b'][..]),
                (&[30, 40][..], &['c', 'd'][..]),
                (&[50][..], &['e'][..]),
            ]
        );
    }

    #[test]
    fn test_chunk_pairs_mismatch() {
        let a = vec![1, 2, 3];
        let b = vec![1, 2];
        assert!(matches!(
            chunk_pairs(2, &a, &b),
            Err(CorpusError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_chunk_ranges_validation() {
        assert!(matches!(
            ChunkRanges::new(0, &[4]),
            Err(CorpusError::InvalidParameter {
                name: "chunk_size",
                ..
            })
        ));
        assert!(matches!(
            ChunkRanges::new(2, &[]),
            Err(CorpusError::InvalidParameter { name: "lengths", .. })
        ));
        assert!(matches!(
            ChunkRanges::new(2, &[4, 4, 3]),
            Err(CorpusError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_chunk_ranges() {
        let ranges = ChunkRanges::new(3, &[7, 7, 7]).unwrap();
        assert_eq!(ranges.n_chunks(), 3);
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges.collect::<Vec<_>>(), vec![0..3, 3..6, 6..7]);

        let ranges = ChunkRanges::new(4, &[8]).unwrap();
        assert_eq!(ranges.collect::<Vec<_>>(), vec![0..4, 4..8]);

        let mut ranges = ChunkRanges::new(4, &[0]).unwrap();
        assert_eq!(ranges.n_chunks(), 0);
        assert_eq!(ranges.next(), None);
    }

    #[test]
    fn test_restartable() {
        let a = vec![1, 2, 3];
        let b = vec![4, 5, 6];
        let chunks = chunk_pairs(2, &a, &b).unwrap();

        let first: Vec<_> = chunks.clone().collect();
        let second: Vec<_> = chunks.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_token_matrix_chunks() {
        let m: TokenMatrix<u32> = TokenMatrix::from_rows([[1, 2], [3, 4], [5, 6]], 2, 0);
        let doc_ids: Vec<usize> = (0..3).collect();

        let chunks: Vec<_> = chunk_pairs(2, &m, &doc_ids).unwrap().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].0.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(chunks[0].1, &[0, 1]);
        assert_eq!(chunks[1].0.shape(), (1, 2));
        assert_eq!(chunks[1].1, &[2]);

        // Views chunk too.
        let view = m.slice_rows(1..3);
        let inner: Vec<_> = chunk_pairs(1, &view, &doc_ids[1..]).unwrap().collect();
        assert_eq!(inner[1].0.as_slice(), &[5, 6]);
        assert_eq!(inner[1].1, &[2]);
    }

    proptest::proptest! {
        #[test]
        fn chunks_reconstruct_inputs(
            a in proptest::collection::vec(proptest::prelude::any::<u32>(), 0..64),
            n in 1usize..10,
        ) {
            let b: Vec<usize> = (0..a.len()).collect();
            let chunks: Vec<(&[u32], &[usize])> = chunk_pairs(n, &a, &b).unwrap().collect();

            proptest::prop_assert_eq!(chunks.len(), a.len().div_ceil(n));
            if let Some((last_a, last_b)) = chunks.last() {
                let expected = if a.len() % n == 0 { n } else { a.len() % n };
                proptest::prop_assert_eq!(last_a.len(), expected);
                proptest::prop_assert_eq!(last_b.len(), expected);
            }

            let flat_a: Vec<u32> = chunks.iter().flat_map(|(x, _)| x.iter().copied()).collect();
            let flat_b: Vec<usize> = chunks.iter().flat_map(|(_, y)| y.iter().copied()).collect();
            proptest::prop_assert_eq!(flat_a, a);
            proptest::prop_assert_eq!(flat_b, b);
        }
    }
}
