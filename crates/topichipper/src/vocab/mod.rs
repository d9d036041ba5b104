//! # Vocabulary Indexing
//!
//! Raw token ids arrive from the tokenizer in its own id space.
//! A [`VocabularyIndex`] counts them, then freezes into a [`CompactIndex`]
//! which re-indexes the words into a dense, frequency-ordered space.
//!
//! ```rust
//! use topichipper::{TokenMatrix, vocab::VocabOptions};
//!
//! let tokens = TokenMatrix::<u32>::from_rows([vec![17, 3, 17], vec![3, 3]], 3, 0);
//!
//! let mut vocab = VocabOptions::default().init::<u64>();
//! vocab.update_count(&tokens)?;
//! vocab.finalize()?;
//!
//! let compact = vocab.to_compact(&tokens)?;
//! assert_eq!(compact.as_slice(), &[2, 1, 2, 1, 1, 0]);
//! # Ok::<(), topichipper::CorpusError>(())
//! ```

mod compact_index;
mod count_table;
mod raw_vocab;
mod vocab_index;

#[doc(inline)]
pub use compact_index::CompactIndex;
#[doc(inline)]
pub use count_table::CountTable;
#[doc(inline)]
pub use raw_vocab::{RawVocab, RawWord};
#[doc(inline)]
pub use vocab_index::{PAD_WORD, VocabOptions, VocabularyIndex};
