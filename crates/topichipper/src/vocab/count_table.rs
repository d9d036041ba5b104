//! # Token Count Table

use crate::errors::{CorpusError, CorpusResult};
use crate::matrix::TokenMatrix;
use crate::types::{CountType, TCHashMap, TokenType, hash_map_new, hash_map_with_capacity};

/// Accumulates `{ raw id -> occurrence count }` across a corpus.
///
/// The pad sentinel is never counted.
#[derive(Debug, Clone)]
pub struct CountTable<T: TokenType, C: CountType> {
    pad: T,
    counts: TCHashMap<T, C>,
}

impl<T: TokenType, C: CountType> CountTable<T, C> {
    /// Create an empty table which ignores `pad`.
    pub fn new(pad: T) -> Self {
        Self {
            pad,
            counts: hash_map_with_capacity(10_000),
        }
    }

    /// The ignored pad sentinel.
    pub fn pad(&self) -> T {
        self.pad
    }

    /// Update counts inplace from a token slice.
    ///
    /// ## Returns
    /// An invalid-parameter error if a count would overflow `C`;
    /// the table is left unchanged in that case.
    pub fn update_from_tokens(
        &mut self,
        tokens: &[T],
    ) -> CorpusResult<()> {
        let pad = self.pad;
        let mut batch: TCHashMap<T, C> = hash_map_new();
        for &token in tokens.iter().filter(|&&t| t != pad) {
            let count = batch.entry(token).or_default();
            *count = count
                .checked_add(&C::one())
                .ok_or_else(CorpusError::count_overflow::<C>)?;
        }

        let merged = batch
            .into_iter()
            .map(|(token, count)| {
                self.get(token)
                    .checked_add(&count)
                    .map(|total| (token, total))
                    .ok_or_else(CorpusError::count_overflow::<C>)
            })
            .collect::<CorpusResult<Vec<(T, C)>>>()?;
        self.counts.extend(merged);
        Ok(())
    }

    /// Update counts inplace from every entry of a matrix.
    pub fn update_from_matrix(
        &mut self,
        matrix: &TokenMatrix<T>,
    ) -> CorpusResult<()> {
        self.update_from_tokens(matrix.as_slice())
    }

    /// The number of distinct ids counted.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The count for `token`; zero when absent.
    pub fn get(
        &self,
        token: T,
    ) -> C {
        self.counts.get(&token).copied().unwrap_or_default()
    }

    /// The sum of all counts.
    ///
    /// ## Returns
    /// An invalid-parameter error if the sum overflows `C`.
    pub fn total(&self) -> CorpusResult<C> {
        self.counts.values().try_fold(C::zero(), |acc, c| {
            acc.checked_add(c)
                .ok_or_else(CorpusError::count_overflow::<C>)
        })
    }

    /// Iterate over `(raw id, count)` entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (T, C)> + '_ {
        self.counts.iter().map(|(&k, &v)| (k, v))
    }

    /// Release the counts and return them.
    pub fn release(self) -> TCHashMap<T, C> {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_skip_pad() {
        let mut table: CountTable<u32, u64> = CountTable::new(0);
        assert!(table.is_empty());

        let m = TokenMatrix::from_rows([vec![1, 2, 3], vec![4, 4]], 3, 0);
        table.update_from_matrix(&m).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get(4), 2);
        assert_eq!(table.get(1), 1);
        assert_eq!(table.get(0), 0);
        assert_eq!(table.get(99), 0);
        assert_eq!(table.total().unwrap(), 5);
    }

    #[test]
    fn test_counts_accumulate_across_batches() {
        let mut table: CountTable<u16, u32> = CountTable::new(u16::MAX);
        table.update_from_tokens(&[7, 7, u16::MAX]).unwrap();
        table.update_from_tokens(&[7, 8]).unwrap();

        let mut counts: Vec<(u16, u32)> = table.release().into_iter().collect();
        counts.sort();
        assert_eq!(counts, vec![(7, 3), (8, 1)]);
    }

    #[test]
    fn test_count_overflow_is_an_error() {
        let mut table: CountTable<u32, u8> = CountTable::new(0);
        table.update_from_tokens(&[1; 200]).unwrap();
        table.update_from_tokens(&[2; 100]).unwrap();

        // 200 + 60 does not fit in u8; the batch is rejected whole.
        assert!(matches!(
            table.update_from_tokens(&[[2u32, 1]; 60].concat()),
            Err(CorpusError::InvalidParameter {
                name: "count type",
                ..
            })
        ));
        assert_eq!(table.get(1), 200);
        assert_eq!(table.get(2), 100);

        // A single batch past the limit fails too.
        let mut table: CountTable<u32, u8> = CountTable::new(0);
        assert!(table.update_from_tokens(&[3; 256]).is_err());
        assert!(table.is_empty());

        // Per-word counts fit, their sum does not.
        let mut table: CountTable<u32, u8> = CountTable::new(0);
        table.update_from_tokens(&[1; 200]).unwrap();
        table.update_from_tokens(&[2; 200]).unwrap();
        assert!(matches!(
            table.total(),
            Err(CorpusError::InvalidParameter {
                name: "count type",
                ..
            })
        ));
    }
}
