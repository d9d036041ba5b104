//! # Topic Model Boundary

use crate::matrix::TokenMatrixView;
use crate::types::{CountType, TokenType};

/// Registration of a categorical latent factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    /// The component name; bindings refer to it.
    pub name: String,

    /// The number of distinct categories (e.g. the number of documents).
    pub cardinality: usize,

    /// The number of topics to fit for this component.
    pub n_topics: usize,
}

/// The per-chunk category ids of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBinding<'a> {
    /// The component name, as registered by [`ComponentSpec::name`].
    pub name: &'a str,

    /// One category id per chunk row.
    pub ids: &'a [usize],
}

/// The construction parameters of a topic model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec<T: TokenType, C: CountType> {
    /// The size of the compact id space, including the pad slot.
    pub n_words: usize,

    /// The number of token columns per document.
    pub max_length: usize,

    /// The dimension of a word vector.
    pub n_hidden: usize,

    /// Compact word ids, pad excluded, by descending count.
    pub keys: Vec<T>,

    /// Occurrence counts, parallel to [`Self::keys`].
    ///
    /// Typically used as a negative-sampling distribution.
    pub counts: Vec<C>,
}

/// A streaming topic model.
///
/// Implementations own all model state; the training driver only feeds them.
pub trait TopicModel {
    /// The token id type of the matrices the model consumes.
    type Token: TokenType;

    /// The model's error type.
    type Error;

    /// Register a categorical latent factor.
    fn add_component(
        &mut self,
        spec: &ComponentSpec,
    ) -> Result<(), Self::Error>;

    /// Perform one incremental training step.
    ///
    /// ## Arguments
    /// * `chunk` - a row range of the cleaned compact token matrix.
    /// * `fraction` - the fraction of the corpus a chunk represents.
    /// * `components` - per-row category ids for registered components.
    fn fit_partial(
        &mut self,
        chunk: TokenMatrixView<'_, Self::Token>,
        fraction: f64,
        components: &[ComponentBinding<'_>],
    ) -> Result<(), Self::Error>;
}
