//! # Error Types

/// Errors from topichipper operations.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// An operation was called out of order.
    ///
    /// E.g. `finalize()` called twice, or the compact index used before `finalize()`.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A parameter was outside its legal range.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// The parameter name.
        name: &'static str,

        /// The rejected value, formatted.
        value: String,
    },

    /// Arrays which must be aligned were not.
    #[error("shape mismatch: expected {expected}, found {actual}")]
    ShapeMismatch {
        /// The expected shape, formatted.
        expected: String,

        /// The actual shape, formatted.
        actual: String,
    },

    /// Tokenizer pattern compilation failed.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl CorpusError {
    /// Build an [`CorpusError::InvalidParameter`].
    pub fn invalid_parameter<V: core::fmt::Display>(
        name: &'static str,
        value: V,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }

    /// Build the [`CorpusError::InvalidParameter`] for a count type too narrow
    /// to hold a corpus total.
    pub fn count_overflow<C>() -> Self {
        Self::invalid_parameter(
            "count type",
            format!("{} overflowed", core::any::type_name::<C>()),
        )
    }

    /// Build a [`CorpusError::ShapeMismatch`].
    pub fn shape_mismatch<E: core::fmt::Debug, A: core::fmt::Debug>(
        expected: E,
        actual: A,
    ) -> Self {
        Self::ShapeMismatch {
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }
}

/// Result type for topichipper operations.
pub type CorpusResult<T> = core::result::Result<T, CorpusError>;
