//! # Vocabulary Index

use crate::errors::{CorpusError, CorpusResult};
use crate::matrix::TokenMatrix;
use crate::types::{CountType, TokenType, token_index};
use crate::vocab::{CompactIndex, CountTable, RawVocab};

/// String form used for the pad slot in [`VocabularyIndex::word_list`].
pub const PAD_WORD: &str = "<pad>";

/// Options for [`VocabularyIndex`].
#[derive(Debug, Clone)]
pub struct VocabOptions<T: TokenType> {
    /// The raw pad sentinel.
    pub pad: T,
}

impl<T: TokenType> Default for VocabOptions<T> {
    fn default() -> Self {
        Self { pad: T::zero() }
    }
}

impl<T: TokenType> VocabOptions<T> {
    /// Sets the raw pad sentinel.
    pub fn with_pad(
        self,
        pad: T,
    ) -> Self {
        Self { pad }
    }

    /// Initializes a [`VocabularyIndex`] from these options.
    pub fn init<C: CountType>(self) -> VocabularyIndex<T, C> {
        VocabularyIndex::new(self)
    }
}

#[derive(Debug, Clone)]
enum IndexState<T: TokenType, C: CountType> {
    Counting(CountTable<T, C>),
    Finalized(CompactIndex<T, C>),
}

/// Counts raw ids, then freezes into a [`CompactIndex`].
///
/// Lifecycle:
/// * [`Self::update_count`] any number of times;
/// * [`Self::finalize`] exactly once;
/// * [`Self::to_compact`] and friends after that.
///
/// # Parameters
/// * `T` - the token id type.
/// * `C` - the type used to store counts.
#[derive(Debug, Clone)]
pub struct VocabularyIndex<T: TokenType = u32, C: CountType = u64> {
    options: VocabOptions<T>,
    state: IndexState<T, C>,
}

impl<T: TokenType, C: CountType> VocabularyIndex<T, C> {
    /// Create a new, empty, counting index.
    pub fn new(options: VocabOptions<T>) -> Self {
        let state = IndexState::Counting(CountTable::new(options.pad));
        Self { options, state }
    }

    /// The raw pad sentinel.
    pub fn raw_pad(&self) -> T {
        self.options.pad
    }

    /// The compact pad sentinel; always zero.
    pub fn compact_pad(&self) -> T {
        T::zero()
    }

    /// Has [`Self::finalize`] run?
    pub fn is_finalized(&self) -> bool {
        matches!(self.state, IndexState::Finalized(_))
    }

    /// Count every non-pad raw id in the matrix.
    ///
    /// ## Returns
    /// An invalid-state error if the index is already finalized;
    /// an invalid-parameter error if a count overflows `C`,
    /// in which case this matrix is not counted.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, matrix)))]
    pub fn update_count(
        &mut self,
        matrix: &TokenMatrix<T>,
    ) -> CorpusResult<()> {
        match &mut self.state {
            IndexState::Counting(table) => table.update_from_matrix(matrix),
            IndexState::Finalized(_) => Err(CorpusError::InvalidState(
                "update_count() called after finalize()".to_string(),
            )),
        }
    }

    /// Freeze the counts and build the compact index.
    ///
    /// ## Returns
    /// An invalid-state error if already finalized, or if nothing was counted.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn finalize(&mut self) -> CorpusResult<()> {
        let table = match &self.state {
            IndexState::Counting(table) => table,
            IndexState::Finalized(_) => {
                return Err(CorpusError::InvalidState(
                    "finalize() called twice".to_string(),
                ));
            }
        };
        if table.is_empty() {
            return Err(CorpusError::InvalidState(
                "finalize() called before any counts were recorded".to_string(),
            ));
        }

        let index = CompactIndex::from_counts(table)?;
        log::info!(
            "Finalized vocabulary: {} words, {} occurrences",
            index.n_words() - 1,
            index.total_count()
        );
        self.state = IndexState::Finalized(index);
        Ok(())
    }

    /// The frozen compact index.
    ///
    /// ## Returns
    /// An invalid-state error before [`Self::finalize`].
    pub fn compact_index(&self) -> CorpusResult<&CompactIndex<T, C>> {
        match &self.state {
            IndexState::Finalized(index) => Ok(index),
            IndexState::Counting(_) => Err(CorpusError::InvalidState(
                "compact index used before finalize()".to_string(),
            )),
        }
    }

    /// The size of the compact space, including the pad slot.
    pub fn n_words(&self) -> CorpusResult<usize> {
        Ok(self.compact_index()?.n_words())
    }

    /// Map a raw matrix into the compact id space.
    ///
    /// Raw ids absent from the index (and the raw pad) map to the compact pad.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, matrix)))]
    pub fn to_compact(
        &self,
        matrix: &TokenMatrix<T>,
    ) -> CorpusResult<TokenMatrix<T>> {
        let index = self.compact_index()?;
        Ok(matrix.map(|raw| index.to_compact_token(raw)))
    }

    /// Map a compact matrix back into the raw id space.
    ///
    /// ## Returns
    /// A shape mismatch error if the matrix holds ids outside the compact space.
    pub fn to_raw(
        &self,
        matrix: &TokenMatrix<T>,
    ) -> CorpusResult<TokenMatrix<T>> {
        let index = self.compact_index()?;
        matrix.try_map(|compact| {
            index.to_raw_token(compact).ok_or_else(|| {
                CorpusError::shape_mismatch(
                    format!("compact id < {}", index.n_words()),
                    compact,
                )
            })
        })
    }

    /// The compact-ordered list of word strings.
    ///
    /// The pad slot is [`PAD_WORD`]; raw ids missing from `raw_vocab`
    /// are rendered as `"<unk:{raw}>"`.
    pub fn word_list(
        &self,
        raw_vocab: &RawVocab<T>,
    ) -> CorpusResult<Vec<String>> {
        let index = self.compact_index()?;
        Ok(index
            .compact_to_raw()
            .iter()
            .enumerate()
            .map(|(compact, &raw)| match (compact, raw_vocab.text(raw)) {
                (0, _) => PAD_WORD.to_string(),
                (_, Some(text)) => text.to_string(),
                (_, None) => format!("<unk:{raw}>"),
            })
            .collect())
    }

    /// Build a sparse bag-of-words for each row of a compact matrix.
    ///
    /// Each row becomes a list of `(compact id, count)` sorted by compact id;
    /// the pad is excluded.
    pub fn to_bag_of_words(
        &self,
        matrix: &TokenMatrix<T>,
    ) -> CorpusResult<Vec<Vec<(T, C)>>> {
        let index = self.compact_index()?;
        let pad = index.compact_pad();

        let mut bags = Vec::with_capacity(matrix.n_rows());
        for row in matrix.rows() {
            let mut ids: Vec<T> = Vec::with_capacity(row.len());
            for &t in row.iter().filter(|&&t| t != pad) {
                if !index.contains_compact(t) {
                    return Err(CorpusError::shape_mismatch(
                        format!("compact id < {}", index.n_words()),
                        token_index(t),
                    ));
                }
                ids.push(t);
            }
            ids.sort_unstable();

            let mut bag: Vec<(T, C)> = Vec::new();
            for t in ids {
                if let Some((last, count)) = bag.last_mut()
                    && *last == t
                {
                    *count += C::one();
                } else {
                    bag.push((t, C::one()));
                }
            }
            bags.push(bag);
        }
        Ok(bags)
    }
}
