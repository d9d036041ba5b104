//! # Corpus Preparation Pipeline
//!
//! Runs the vocabulary and filter stages over a raw token matrix:
//! `update_count -> finalize -> to_compact -> filter_count_range -> subsample_frequent`.
//!
//! ```rust
//! use topichipper::{TokenMatrix, pipeline::CorpusPipelineOptions};
//!
//! let raw = TokenMatrix::<u32>::from_rows([vec![1, 2, 3], vec![4, 4, 0]], 3, 0);
//!
//! let prepared = CorpusPipelineOptions::<u32, u64>::default()
//!     .with_min_count(2)
//!     .with_subsample_threshold(None)
//!     .init()
//!     .prepare(&raw)?;
//!
//! assert_eq!(prepared.clean.as_slice(), &[0, 0, 0, 1, 1, 0]);
//! assert_eq!(prepared.doc_ids(), vec![0, 1]);
//! # Ok::<(), topichipper::CorpusError>(())
//! ```

use rand::{SeedableRng, rngs::StdRng};

use crate::errors::CorpusResult;
use crate::filter::{CorpusFilter, DEFAULT_SUBSAMPLE_THRESHOLD};
use crate::matrix::TokenMatrix;
use crate::training::ModelSpec;
use crate::types::{CountType, TokenType};
use crate::vocab::{RawVocab, VocabOptions, VocabularyIndex};

/// Options for [`CorpusPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusPipelineOptions<T: TokenType, C: CountType> {
    /// The raw pad sentinel.
    pub pad: T,

    /// Words seen fewer times than this are masked; `<= 0` disables.
    pub min_count: C,

    /// Words seen more times than this are masked; `<= 0` disables.
    pub max_count: C,

    /// The frequent-word subsampling threshold; `None` skips subsampling.
    pub subsample_threshold: Option<f64>,

    /// The seed of the subsampling rng.
    pub seed: u64,
}

impl<T: TokenType, C: CountType> Default for CorpusPipelineOptions<T, C> {
    fn default() -> Self {
        Self {
            pad: T::zero(),
            min_count: C::from_u8(5).unwrap_or_default(),
            max_count: C::zero(),
            subsample_threshold: Some(DEFAULT_SUBSAMPLE_THRESHOLD),
            seed: 0,
        }
    }
}

impl<T: TokenType, C: CountType> CorpusPipelineOptions<T, C> {
    /// Sets the raw pad sentinel.
    pub fn with_pad(
        self,
        pad: T,
    ) -> Self {
        Self { pad, ..self }
    }

    /// Sets the minimum word count.
    pub fn with_min_count(
        self,
        min_count: C,
    ) -> Self {
        Self { min_count, ..self }
    }

    /// Sets the maximum word count.
    pub fn with_max_count(
        self,
        max_count: C,
    ) -> Self {
        Self { max_count, ..self }
    }

    /// Sets the subsampling threshold.
    pub fn with_subsample_threshold(
        self,
        subsample_threshold: Option<f64>,
    ) -> Self {
        Self {
            subsample_threshold,
            ..self
        }
    }

    /// Sets the subsampling seed.
    pub fn with_seed(
        self,
        seed: u64,
    ) -> Self {
        Self { seed, ..self }
    }

    /// Initializes a [`CorpusPipeline`] from these options.
    pub fn init(self) -> CorpusPipeline<T, C> {
        CorpusPipeline::new(self)
    }
}

/// A corpus after vocabulary compaction and filtering.
#[derive(Debug, Clone)]
pub struct PreparedCorpus<T: TokenType, C: CountType> {
    /// The finalized vocabulary index.
    pub index: VocabularyIndex<T, C>,

    /// The cleaned compact token matrix.
    pub clean: TokenMatrix<T>,

    /// Compact word ids, pad excluded, by descending count.
    pub keys: Vec<T>,

    /// Word counts, parallel to [`Self::keys`].
    pub counts: Vec<C>,
}

impl<T: TokenType, C: CountType> PreparedCorpus<T, C> {
    /// The number of documents.
    pub fn n_docs(&self) -> usize {
        self.clean.n_rows()
    }

    /// The size of the compact space, including the pad slot.
    pub fn n_words(&self) -> usize {
        self.keys.len() + 1
    }

    /// One document id per row: `0..n_docs`.
    pub fn doc_ids(&self) -> Vec<usize> {
        (0..self.n_docs()).collect()
    }

    /// The compact-ordered word strings; see [`VocabularyIndex::word_list`].
    pub fn word_list(
        &self,
        raw_vocab: &RawVocab<T>,
    ) -> CorpusResult<Vec<String>> {
        self.index.word_list(raw_vocab)
    }

    /// The construction parameters of a model over this corpus.
    ///
    /// ## Arguments
    /// * `n_hidden` - the word vector dimension.
    pub fn model_spec(
        &self,
        n_hidden: usize,
    ) -> ModelSpec<T, C> {
        ModelSpec {
            n_words: self.n_words(),
            max_length: self.clean.n_cols(),
            n_hidden,
            keys: self.keys.clone(),
            counts: self.counts.clone(),
        }
    }
}

/// Builds a [`PreparedCorpus`] from a raw token matrix.
#[derive(Debug, Clone)]
pub struct CorpusPipeline<T: TokenType, C: CountType> {
    /// Pipeline options.
    pub options: CorpusPipelineOptions<T, C>,
}

impl<T: TokenType, C: CountType> CorpusPipeline<T, C> {
    /// Create a new pipeline.
    pub fn new(options: CorpusPipelineOptions<T, C>) -> Self {
        Self { options }
    }

    /// Count, compact, and filter a raw token matrix.
    ///
    /// ## Returns
    /// The prepared corpus; or an invalid-state error if the matrix holds
    /// no words, or an invalid-parameter error for a bad threshold.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, raw)))]
    pub fn prepare(
        &self,
        raw: &TokenMatrix<T>,
    ) -> CorpusResult<PreparedCorpus<T, C>> {
        let options = &self.options;
        log::info!(
            "Preparing corpus: {} documents x {} columns",
            raw.n_rows(),
            raw.n_cols()
        );

        let mut index = VocabOptions::default().with_pad(options.pad).init::<C>();
        index.update_count(raw)?;
        index.finalize()?;
        let compact = index.to_compact(raw)?;

        let (clean, keys, counts) = {
            let filter = CorpusFilter::new(&index)?;
            let mut clean =
                filter.filter_count_range(&compact, options.min_count, options.max_count)?;
            if let Some(threshold) = options.subsample_threshold {
                let mut rng = StdRng::seed_from_u64(options.seed);
                clean = filter.subsample_frequent(&clean, threshold, &mut rng)?;
            }
            let (keys, counts) = filter.keys_counts();
            (clean, keys, counts)
        };

        Ok(PreparedCorpus {
            index,
            clean,
            keys,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CorpusError;

    fn raw() -> TokenMatrix<u32> {
        TokenMatrix::from_rows([vec![1, 2, 3], vec![4, 4, 0]], 3, 0)
    }

    #[test]
    fn test_defaults() {
        let options = CorpusPipelineOptions::<u32, u64>::default();
        assert_eq!(options.pad, 0);
        assert_eq!(options.min_count, 5);
        assert_eq!(options.max_count, 0);
        assert_eq!(options.subsample_threshold, Some(1e-5));
        assert_eq!(options.seed, 0);
    }

    #[test]
    fn test_prepare() {
        let prepared = CorpusPipelineOptions::<u32, u64>::default()
            .with_min_count(2)
            .with_subsample_threshold(None)
            .init()
            .prepare(&raw())
            .unwrap();

        assert_eq!(prepared.clean.as_slice(), &[0, 0, 0, 1, 1, 0]);
        assert_eq!(
            prepared.index.to_raw(&prepared.clean).unwrap().as_slice(),
            &[0, 0, 0, 4, 4, 0]
        );
        assert_eq!(prepared.keys, vec![1, 2, 3, 4]);
        assert_eq!(prepared.counts, vec![2, 1, 1, 1]);
        assert_eq!(prepared.n_docs(), 2);
        assert_eq!(prepared.n_words(), 5);

        let spec = prepared.model_spec(8);
        assert_eq!(spec.n_words, 5);
        assert_eq!(spec.max_length, 3);
        assert_eq!(spec.n_hidden, 8);
        assert_eq!(spec.counts, prepared.counts);
    }

    #[test]
    fn test_prepare_is_deterministic() {
        let raw = TokenMatrix::<u32>::from_rows(
            (0..50).map(|i| vec![1, 1, 1, 2 + (i % 7), 1, 9]),
            6,
            0,
        );
        let pipeline = CorpusPipelineOptions::<u32, u64>::default()
            .with_min_count(0)
            .with_subsample_threshold(Some(0.05))
            .with_seed(7)
            .init();

        let a = pipeline.prepare(&raw).unwrap();
        let b = pipeline.prepare(&raw).unwrap();
        assert_eq!(a.clean, b.clean);
        assert!(a.clean.count_non_pad(0) < raw.count_non_pad(0));
    }

    #[test]
    fn test_prepare_empty_corpus() {
        let raw = TokenMatrix::<u32>::filled(3, 4, 0);
        assert!(matches!(
            CorpusPipelineOptions::<u32, u64>::default()
                .init()
                .prepare(&raw),
            Err(CorpusError::InvalidState(_))
        ));
    }

    #[test]
    fn test_prepare_bad_threshold() {
        assert!(matches!(
            CorpusPipelineOptions::<u32, u64>::default()
                .with_subsample_threshold(Some(0.0))
                .init()
                .prepare(&raw()),
            Err(CorpusError::InvalidParameter {
                name: "threshold",
                ..
            })
        ));
    }
}
