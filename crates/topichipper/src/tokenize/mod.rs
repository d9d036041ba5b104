//! # Tokenizer Boundary
//!
//! Linguistic tokenization is an external concern; the corpus pipeline only
//! needs a [`TokenMatrix`] of raw ids and a [`crate::vocab::RawVocab`] describing them.
//! [`DocumentTokenizer`] is that contract.
//!
//! [`RegexTokenizer`] is a small word-span implementation, good enough
//! for driving the pipeline from plain text.
//!
//! [`TokenMatrix`]: crate::matrix::TokenMatrix

mod regex_tokenizer;
mod tokenizer;

#[doc(inline)]
pub use regex_tokenizer::{DEFAULT_WORD_PATTERN, RegexTokenizer, RegexTokenizerOptions};
#[doc(inline)]
pub use tokenizer::DocumentTokenizer;
