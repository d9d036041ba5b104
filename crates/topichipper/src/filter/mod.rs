//! # Corpus Filtering
//!
//! Once a [`crate::vocab::VocabularyIndex`] is finalized, a [`CorpusFilter`]
//! prunes compact token matrices:
//! * [`CorpusFilter::filter_count`] masks rare words;
//! * [`CorpusFilter::filter_count_range`] additionally masks over-frequent words;
//! * [`CorpusFilter::subsample_frequent`] randomly thins out frequent words,
//!   following the usual power-law downsampling law.
//!
//! Words tend to have power law frequency; without subsampling, a handful of
//! very common words dominate every minibatch.

mod corpus_filter;

#[doc(inline)]
pub use corpus_filter::{CorpusFilter, DEFAULT_SUBSAMPLE_THRESHOLD, drop_probability};
