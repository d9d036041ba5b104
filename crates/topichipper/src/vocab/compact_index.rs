//! # Compact Index
//!
//! Tokenizers hand out raw ids from their own (possibly sparse, gapped) id space.
//! A [`CompactIndex`] is the explicit bidirectional table between that raw space
//! and a dense compact space `[0, n_words)`.
//!
//! Layout of the compact space:
//! * compact id `0` is the pad sentinel; it maps to the raw pad id.
//! * compact ids `1..n_words` are the counted words, ordered by descending count.
//! * count ties are broken by ascending raw id, so the layout is reproducible.

use core::cmp::Reverse;

use crate::errors::{CorpusError, CorpusResult};
use crate::types::{CountType, TCHashMap, TokenType, hash_map_with_capacity, token_index};
use crate::vocab::CountTable;

/// Frozen `{ raw id <-> compact id }` table with per-word counts.
#[derive(Debug, Clone)]
pub struct CompactIndex<T: TokenType, C: CountType> {
    raw_pad: T,
    raw_to_compact: TCHashMap<T, T>,
    compact_to_raw: Vec<T>,
    compact_counts: Vec<C>,
    total: C,
}

impl<T: TokenType, C: CountType> CompactIndex<T, C> {
    /// Build the index from a count table.
    ///
    /// ## Returns
    /// The index; or an error if the compact space does not fit in `T`,
    /// or the total count does not fit in `C`.
    pub fn from_counts(table: &CountTable<T, C>) -> CorpusResult<Self> {
        let mut ranked: Vec<(T, C)> = table.iter().collect();
        ranked.sort_unstable_by_key(|&(raw, count)| (Reverse(count), raw));

        let n_words = ranked.len() + 1;
        if T::from_usize(n_words - 1).is_none() {
            return Err(CorpusError::invalid_parameter("n_words", n_words));
        }

        let raw_pad = table.pad();
        let mut raw_to_compact = hash_map_with_capacity(n_words);
        let mut compact_to_raw = Vec::with_capacity(n_words);
        let mut compact_counts = Vec::with_capacity(n_words);

        raw_to_compact.insert(raw_pad, T::zero());
        compact_to_raw.push(raw_pad);
        compact_counts.push(C::zero());

        let mut total = C::zero();
        for (raw, count) in ranked {
            let compact = T::from_usize(compact_to_raw.len())
                .ok_or_else(|| CorpusError::invalid_parameter("n_words", n_words))?;
            raw_to_compact.insert(raw, compact);
            compact_to_raw.push(raw);
            compact_counts.push(count);
            total = total
                .checked_add(&count)
                .ok_or_else(CorpusError::count_overflow::<C>)?;
        }

        Ok(Self {
            raw_pad,
            raw_to_compact,
            compact_to_raw,
            compact_counts,
            total,
        })
    }

    /// The pad sentinel in the raw id space.
    pub fn raw_pad(&self) -> T {
        self.raw_pad
    }

    /// The pad sentinel in the compact id space; always zero.
    pub fn compact_pad(&self) -> T {
        T::zero()
    }

    /// The size of the compact id space, including the pad slot.
    pub fn n_words(&self) -> usize {
        self.compact_to_raw.len()
    }

    /// The sum of all word counts.
    pub fn total_count(&self) -> C {
        self.total
    }

    /// Map a raw id to its compact id; unknown ids map to the compact pad.
    pub fn to_compact_token(
        &self,
        raw: T,
    ) -> T {
        self.raw_to_compact
            .get(&raw)
            .copied()
            .unwrap_or_else(T::zero)
    }

    /// Map a compact id back to its raw id.
    pub fn to_raw_token(
        &self,
        compact: T,
    ) -> Option<T> {
        self.compact_to_raw.get(token_index(compact)).copied()
    }

    /// Returns true if `compact` is a valid compact id.
    pub fn contains_compact(
        &self,
        compact: T,
    ) -> bool {
        token_index(compact) < self.n_words()
    }

    /// The count of a compact id; zero for the pad and unknown ids.
    pub fn count(
        &self,
        compact: T,
    ) -> C {
        self.compact_counts
            .get(token_index(compact))
            .copied()
            .unwrap_or_default()
    }

    /// The count of a raw id; zero for the pad and unknown ids.
    pub fn raw_count(
        &self,
        raw: T,
    ) -> C {
        match self.raw_to_compact.get(&raw) {
            Some(&compact) => self.count(compact),
            None => C::zero(),
        }
    }

    /// Per compact id counts, indexed by compact id.
    pub fn compact_counts(&self) -> &[C] {
        &self.compact_counts
    }

    /// Raw ids, indexed by compact id.
    pub fn compact_to_raw(&self) -> &[T] {
        &self.compact_to_raw
    }

    /// Parallel `(compact id, count)` arrays, pad excluded, by descending count.
    pub fn keys_counts(&self) -> (Vec<T>, Vec<C>) {
        // Compact order is already descending count.
        (1..self.n_words())
            .map(|idx| {
                let key = T::from_usize(idx).unwrap_or_else(T::zero);
                (key, self.compact_counts[idx])
            })
            .unzip()
    }
}
