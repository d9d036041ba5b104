//! # `topichipper` Topic Corpus Toolkit
//!
//! Corpus preparation and minibatch training plumbing for topic-vector models.
//!
//! Raw documents are tokenized into a padded token-id matrix; the words are
//! re-indexed into a dense frequency-ordered id space, pruned and subsampled;
//! and the cleaned matrix is fed to an external model in aligned chunks.
//!
//! See:
//! * [`tokenize`] to turn documents into a raw [`TokenMatrix`].
//! * [`vocab`] to count and compact raw token ids.
//! * [`filter`] to prune rare and frequent words.
//! * [`chunks`] to split aligned arrays into minibatches.
//! * [`training`] to drive a [`training::TopicModel`].
//! * [`pipeline`] to run the vocabulary and filter stages in one call.
//!
//! ```rust
//! use topichipper::{
//!     pipeline::CorpusPipelineOptions,
//!     tokenize::{DocumentTokenizer, RegexTokenizerOptions},
//! };
//!
//! let docs = [
//!     "the cat sat on the mat",
//!     "the dog sat on the log",
//!     "a cat and a dog",
//! ];
//!
//! let mut tokenizer = RegexTokenizerOptions::<u32>::new(8).init()?;
//! let raw = tokenizer.tokenize_batch(&docs)?;
//!
//! let prepared = CorpusPipelineOptions::<u32, u64>::default()
//!     .with_min_count(2)
//!     .with_subsample_threshold(None)
//!     .init()
//!     .prepare(&raw)?;
//!
//! let words = prepared.word_list(tokenizer.raw_vocab())?;
//! assert_eq!(words[0], "<pad>");
//! assert_eq!(words[1], "the");
//! # Ok::<(), topichipper::CorpusError>(())
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod chunks;
pub mod errors;
pub mod filter;
pub mod matrix;
pub mod pipeline;
pub mod tokenize;
pub mod training;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{CorpusError, CorpusResult};
#[doc(inline)]
pub use matrix::{TokenMatrix, TokenMatrixView};
