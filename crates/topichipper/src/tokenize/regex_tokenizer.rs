//! # Regex Word Tokenizer

use regex::Regex;

use crate::errors::{CorpusError, CorpusResult};
use crate::matrix::TokenMatrix;
use crate::tokenize::DocumentTokenizer;
use crate::types::{TCHashMap, TokenType, hash_map_with_capacity};
use crate::vocab::RawVocab;

/// The default word span pattern.
pub const DEFAULT_WORD_PATTERN: &str = r"\w+(?:'\w+)?";

/// Options for [`RegexTokenizer`].
#[derive(Debug, Clone)]
pub struct RegexTokenizerOptions<T: TokenType> {
    /// The word span pattern.
    pub pattern: String,

    /// Lowercase words before lookup.
    pub lowercase: bool,

    /// The number of token columns per document.
    pub max_length: usize,

    /// The raw pad sentinel; never handed out as a word id.
    pub pad: T,
}

impl<T: TokenType> RegexTokenizerOptions<T> {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `max_length` - the number of token columns per document.
    pub fn new(max_length: usize) -> Self {
        Self {
            pattern: DEFAULT_WORD_PATTERN.to_string(),
            lowercase: true,
            max_length,
            pad: T::zero(),
        }
    }

    /// Sets the word span pattern.
    pub fn with_pattern<S: Into<String>>(
        self,
        pattern: S,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Sets lowercasing.
    pub fn with_lowercase(
        self,
        lowercase: bool,
    ) -> Self {
        Self { lowercase, ..self }
    }

    /// Sets the number of token columns per document.
    pub fn with_max_length(
        self,
        max_length: usize,
    ) -> Self {
        Self { max_length, ..self }
    }

    /// Sets the raw pad sentinel.
    pub fn with_pad(
        self,
        pad: T,
    ) -> Self {
        Self { pad, ..self }
    }

    /// Initializes a [`RegexTokenizer`] from these options.
    ///
    /// ## Returns
    /// The tokenizer; or an error if the pattern does not compile.
    pub fn init(self) -> CorpusResult<RegexTokenizer<T>> {
        RegexTokenizer::new(self)
    }
}

/// Splits documents into regex word spans, assigning raw ids in first-seen order.
#[derive(Debug, Clone)]
pub struct RegexTokenizer<T: TokenType> {
    options: RegexTokenizerOptions<T>,
    regex: Regex,
    lexicon: TCHashMap<String, T>,
    raw_vocab: RawVocab<T>,
    next_id: usize,
}

impl<T: TokenType> RegexTokenizer<T> {
    /// Build a tokenizer.
    pub fn new(options: RegexTokenizerOptions<T>) -> CorpusResult<Self> {
        let regex = Regex::new(&options.pattern)?;
        Ok(Self {
            options,
            regex,
            lexicon: hash_map_with_capacity(10_000),
            raw_vocab: RawVocab::new(),
            next_id: 0,
        })
    }

    /// The tokenizer options.
    pub fn options(&self) -> &RegexTokenizerOptions<T> {
        &self.options
    }

    fn allocate_id(&mut self) -> CorpusResult<T> {
        loop {
            let id = T::from_usize(self.next_id)
                .ok_or_else(|| CorpusError::invalid_parameter("raw vocab size", self.next_id))?;
            self.next_id += 1;
            if id != self.options.pad {
                return Ok(id);
            }
        }
    }

    fn lookup_or_insert(
        &mut self,
        word: &str,
    ) -> CorpusResult<T> {
        if let Some(&id) = self.lexicon.get(word) {
            return Ok(id);
        }
        let id = self.allocate_id()?;
        self.lexicon.insert(word.to_string(), id);
        self.raw_vocab.insert(id, word, 0);
        Ok(id)
    }

    /// Tokenize one document, up to `max_length` words.
    pub fn tokenize_document(
        &mut self,
        doc: &str,
    ) -> CorpusResult<Vec<T>> {
        let max_length = self.options.max_length;
        let lowercase = self.options.lowercase;

        let words: Vec<String> = self
            .regex
            .find_iter(doc)
            .take(max_length)
            .map(|m| match lowercase {
                true => m.as_str().to_lowercase(),
                false => m.as_str().to_string(),
            })
            .collect();

        let ids = words
            .iter()
            .map(|word| self.lookup_or_insert(word))
            .collect::<CorpusResult<Vec<T>>>()?;

        let mut distinct = ids.clone();
        distinct.sort_unstable();
        distinct.dedup();
        for id in distinct {
            self.raw_vocab.note_document(id);
        }

        Ok(ids)
    }
}

impl<T: TokenType> DocumentTokenizer<T> for RegexTokenizer<T> {
    fn max_length(&self) -> usize {
        self.options.max_length
    }

    fn pad(&self) -> T {
        self.options.pad
    }

    fn tokenize_batch<S: AsRef<str>>(
        &mut self,
        docs: &[S],
    ) -> CorpusResult<TokenMatrix<T>> {
        let rows = docs
            .iter()
            .map(|doc| self.tokenize_document(doc.as_ref()))
            .collect::<CorpusResult<Vec<_>>>()?;
        Ok(TokenMatrix::from_rows(
            rows,
            self.options.max_length,
            self.options.pad,
        ))
    }

    fn raw_vocab(&self) -> &RawVocab<T> {
        &self.raw_vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_batch() {
        let mut tokenizer: RegexTokenizer<u32> = RegexTokenizerOptions::new(4).init().unwrap();

        let m = tokenizer
            .tokenize_batch(&["The cat saw the dog", "Dog's day", ""])
            .unwrap();
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.row(0), &[1, 2, 3, 1]);
        assert_eq!(m.row(1), &[4, 5, 0, 0]);
        assert_eq!(m.row(2), &[0, 0, 0, 0]);

        // "dog" was past max_length in the first document; it was never seen.
        let raw_vocab = tokenizer.raw_vocab();
        assert_eq!(raw_vocab.len(), 5);
        assert_eq!(raw_vocab.text(1), Some("the"));
        assert_eq!(raw_vocab.text(4), Some("dog's"));
        assert_eq!(raw_vocab.get(1).map(|w| w.doc_freq), Some(1));
        assert!(raw_vocab.iter().all(|(_, w)| w.text != "dog"));
    }

    #[test]
    fn test_ids_stable_across_batches() {
        let mut tokenizer: RegexTokenizer<u16> = RegexTokenizerOptions::new(3)
            .with_lowercase(false)
            .init()
            .unwrap();

        let a = tokenizer.tokenize_batch(&["a b A"]).unwrap();
        let b = tokenizer.tokenize_batch(&["A a"]).unwrap();
        assert_eq!(a.row(0), &[1, 2, 3]);
        assert_eq!(b.row(0), &[3, 1, 0]);
        assert_eq!(tokenizer.raw_vocab().get(1).map(|w| w.doc_freq), Some(2));
    }

    #[test]
    fn test_pad_is_skipped() {
        let mut tokenizer: RegexTokenizer<u8> = RegexTokenizerOptions::new(2)
            .with_pad(1)
            .init()
            .unwrap();

        let m = tokenizer.tokenize_batch(&["x y", "z"]).unwrap();
        assert_eq!(m.as_slice(), &[0, 2, 3, 1]);
    }

    #[test]
    fn test_id_space_exhausted() {
        let mut tokenizer: RegexTokenizer<u8> =
            RegexTokenizerOptions::new(300).init().unwrap();

        let doc: String = (0..300).map(|i| format!("w{i} ")).collect();
        assert!(matches!(
            tokenizer.tokenize_batch(&[doc]),
            Err(CorpusError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_bad_pattern() {
        assert!(matches!(
            RegexTokenizerOptions::<u32>::new(4).with_pattern("(").init(),
            Err(CorpusError::Regex(_))
        ));
    }
}
