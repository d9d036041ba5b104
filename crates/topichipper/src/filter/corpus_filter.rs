//! # Corpus Filter

use rand::Rng;

use crate::errors::{CorpusError, CorpusResult};
use crate::matrix::TokenMatrix;
use crate::types::{CountType, TokenType, token_index};
use crate::vocab::{CompactIndex, VocabularyIndex};

/// The default [`CorpusFilter::subsample_frequent`] threshold.
pub const DEFAULT_SUBSAMPLE_THRESHOLD: f64 = 1e-5;

/// The probability of dropping an occurrence of a word with relative frequency `freq`.
///
/// `p(f) = max(0, 1 - sqrt(threshold / f))`; words at or below the
/// threshold frequency are never dropped.
pub fn drop_probability(
    freq: f64,
    threshold: f64,
) -> f64 {
    if freq <= 0.0 {
        return 0.0;
    }
    (1.0 - (threshold / freq).sqrt()).max(0.0)
}

/// Masks rare, over-frequent, and randomly subsampled occurrences in a compact matrix.
///
/// All operations are pure: they return a new matrix of the input's shape,
/// with masked positions set to the compact pad.
#[derive(Debug, Clone, Copy)]
pub struct CorpusFilter<'a, T: TokenType, C: CountType> {
    index: &'a CompactIndex<T, C>,
}

impl<'a, T: TokenType, C: CountType> CorpusFilter<'a, T, C> {
    /// Build a filter over a finalized vocabulary.
    ///
    /// ## Returns
    /// An invalid-state error if the vocabulary is not finalized.
    pub fn new(vocab: &'a VocabularyIndex<T, C>) -> CorpusResult<Self> {
        Ok(Self::from_index(vocab.compact_index()?))
    }

    /// Build a filter over a compact index.
    pub fn from_index(index: &'a CompactIndex<T, C>) -> Self {
        Self { index }
    }

    /// The underlying compact index.
    pub fn index(&self) -> &'a CompactIndex<T, C> {
        self.index
    }

    fn check_compact(
        &self,
        matrix: &TokenMatrix<T>,
    ) -> CorpusResult<()> {
        match matrix
            .as_slice()
            .iter()
            .find(|&&t| !self.index.contains_compact(t))
        {
            None => Ok(()),
            Some(&t) => Err(CorpusError::shape_mismatch(
                format!("compact id < {}", self.index.n_words()),
                token_index(t),
            )),
        }
    }

    fn mask_by<F>(
        &self,
        matrix: &TokenMatrix<T>,
        mut keep: F,
    ) -> CorpusResult<TokenMatrix<T>>
    where
        F: FnMut(T) -> bool,
    {
        self.check_compact(matrix)?;
        let pad = self.index.compact_pad();
        Ok(matrix.map(|t| if t == pad || keep(t) { t } else { pad }))
    }

    /// Mask every occurrence of a word whose total count is below `min_count`.
    ///
    /// `min_count <= 0` is a no-op. Words are never removed from the index.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, matrix)))]
    pub fn filter_count(
        &self,
        matrix: &TokenMatrix<T>,
        min_count: C,
    ) -> CorpusResult<TokenMatrix<T>> {
        self.filter_count_range(matrix, min_count, C::zero())
    }

    /// Mask words whose total count is below `min_count` or above `max_count`.
    ///
    /// Either bound `<= 0` is disabled.
    ///
    /// ## Returns
    /// An invalid-parameter error if both bounds are enabled and
    /// `min_count > max_count`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, matrix)))]
    pub fn filter_count_range(
        &self,
        matrix: &TokenMatrix<T>,
        min_count: C,
        max_count: C,
    ) -> CorpusResult<TokenMatrix<T>> {
        let zero = C::zero();
        if min_count > zero && max_count > zero && min_count > max_count {
            return Err(CorpusError::invalid_parameter(
                "max_count",
                format!("{max_count} < min_count {min_count}"),
            ));
        }

        let index = self.index;
        let keep: Vec<bool> = index
            .compact_counts()
            .iter()
            .map(|&count| {
                (min_count <= zero || count >= min_count)
                    && (max_count <= zero || count <= max_count)
            })
            .collect();

        let masked = keep.iter().skip(1).filter(|&&k| !k).count();
        log::info!(
            "Count filter [{min_count}, {max_count}]: masking {masked} of {} words",
            index.n_words() - 1
        );

        self.mask_by(matrix, |t| keep[token_index(t)])
    }

    /// Randomly drop occurrences of frequent words.
    ///
    /// Each non-pad occurrence of a word with corpus relative frequency `f` is
    /// dropped independently with probability [`drop_probability`]`(f, threshold)`.
    ///
    /// ## Arguments
    /// * `matrix` - a compact matrix.
    /// * `threshold` - the frequency above which words are subsampled; must be positive.
    /// * `rng` - the random source.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, matrix, rng)))]
    pub fn subsample_frequent<R: Rng>(
        &self,
        matrix: &TokenMatrix<T>,
        threshold: f64,
        rng: &mut R,
    ) -> CorpusResult<TokenMatrix<T>> {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(CorpusError::invalid_parameter("threshold", threshold));
        }

        let index = self.index;
        let total = index.total_count().to_f64().unwrap_or_default();
        let drop_probs: Vec<f64> = index
            .compact_counts()
            .iter()
            .map(|&count| match count.to_f64() {
                Some(count) if total > 0.0 => drop_probability(count / total, threshold),
                _ => 0.0,
            })
            .collect();

        let before = matrix.count_non_pad(index.compact_pad());
        let clean = self.mask_by(matrix, |t| {
            let p = drop_probs[token_index(t)];
            p <= 0.0 || rng.random::<f64>() >= p
        })?;
        log::info!(
            "Subsampled frequent words (threshold {threshold:e}): kept {} of {before} tokens",
            clean.count_non_pad(index.compact_pad())
        );

        Ok(clean)
    }

    /// Parallel `(compact id, count)` arrays, pad excluded, by descending count.
    pub fn keys_counts(&self) -> (Vec<T>, Vec<C>) {
        self.index.keys_counts()
    }
}
