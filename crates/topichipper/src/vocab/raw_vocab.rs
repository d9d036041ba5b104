//! # Raw Vocabulary
//!
//! The tokenizer's own `{ raw id -> word metadata }` table.

use crate::types::{TCHashMap, TokenType, hash_map_new};

/// Metadata for a raw id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWord {
    /// The string form.
    pub text: String,

    /// The number of documents containing the word.
    pub doc_freq: usize,
}

/// `{ raw id -> RawWord }` map.
///
/// ## Style Hints
/// Instance names should prefer `raw_vocab`.
#[derive(Debug, Clone)]
pub struct RawVocab<T: TokenType> {
    words: TCHashMap<T, RawWord>,
}

impl<T: TokenType> Default for RawVocab<T> {
    fn default() -> Self {
        Self {
            words: hash_map_new(),
        }
    }
}

impl<T: TokenType> RawVocab<T> {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a word.
    pub fn insert<S: Into<String>>(
        &mut self,
        raw: T,
        text: S,
        doc_freq: usize,
    ) {
        self.words.insert(
            raw,
            RawWord {
                text: text.into(),
                doc_freq,
            },
        );
    }

    /// Look up a word.
    pub fn get(
        &self,
        raw: T,
    ) -> Option<&RawWord> {
        self.words.get(&raw)
    }

    /// Look up the string form of a word.
    pub fn text(
        &self,
        raw: T,
    ) -> Option<&str> {
        self.get(raw).map(|w| w.text.as_str())
    }

    /// Bump the document frequency of a known word.
    ///
    /// ## Returns
    /// `false` if the word is unknown.
    pub fn note_document(
        &mut self,
        raw: T,
    ) -> bool {
        match self.words.get_mut(&raw) {
            Some(word) => {
                word.doc_freq += 1;
                true
            }
            None => false,
        }
    }

    /// The number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if there are no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over `(raw id, word)` entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &RawWord)> {
        self.words.iter().map(|(&k, v)| (k, v))
    }
}
