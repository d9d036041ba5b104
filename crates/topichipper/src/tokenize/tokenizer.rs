//! # Document Tokenizer Trait

use crate::errors::CorpusResult;
use crate::matrix::TokenMatrix;
use crate::types::TokenType;
use crate::vocab::RawVocab;

/// Turns text documents into rows of raw token ids.
///
/// Raw ids are stable across batches of the same tokenizer; they may be sparse.
pub trait DocumentTokenizer<T: TokenType> {
    /// The number of token columns per document.
    fn max_length(&self) -> usize;

    /// The raw pad sentinel used for short documents.
    fn pad(&self) -> T;

    /// Tokenize a batch of documents into a `(docs.len(), max_length)` matrix.
    fn tokenize_batch<S: AsRef<str>>(
        &mut self,
        docs: &[S],
    ) -> CorpusResult<TokenMatrix<T>>;

    /// The raw vocabulary of everything tokenized so far.
    fn raw_vocab(&self) -> &RawVocab<T>;
}
