use serde::Serialize;
use topichipper::{
    TokenMatrixView,
    training::{ComponentBinding, ComponentSpec, ModelSpec, TopicModel},
};

/// Errors raised by [`DryRunModel`].
#[derive(Debug, thiserror::Error)]
pub enum DryRunError {
    /// A binding names a component that was never registered.
    #[error("unregistered component: {0:?}")]
    UnknownComponent(String),

    /// A binding's ids do not line up with the chunk rows.
    #[error("component {name:?} has {ids} ids for {rows} rows")]
    Misaligned {
        /// The component name.
        name: String,
        /// Chunk rows.
        rows: usize,
        /// Binding ids.
        ids: usize,
    },

    /// A category id is outside the registered cardinality.
    #[error("component {name:?}: category {id} >= {cardinality}")]
    CategoryOutOfRange {
        /// The component name.
        name: String,
        /// The offending id.
        id: usize,
        /// The registered cardinality.
        cardinality: usize,
    },

    /// A chunk holds a token outside the model's word space.
    #[error("token {token} >= n_words {n_words}")]
    TokenOutOfRange {
        /// The offending token.
        token: u32,
        /// The model word space size.
        n_words: usize,
    },
}

/// Per-chunk tallies.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChunkStats {
    /// Rows in the chunk.
    pub rows: usize,

    /// Non-pad tokens in the chunk.
    pub tokens: usize,
}

/// A model which checks and tallies what the driver feeds it, without fitting.
#[derive(Debug)]
pub struct DryRunModel {
    spec: ModelSpec<u32, u64>,
    components: Vec<ComponentSpec>,
    chunks: Vec<ChunkStats>,
}

impl DryRunModel {
    /// Create a dry-run model for a corpus.
    pub fn new(spec: ModelSpec<u32, u64>) -> Self {
        log::info!(
            "DryRunModel: n_words={} max_length={} n_hidden={}",
            spec.n_words,
            spec.max_length,
            spec.n_hidden
        );
        Self {
            spec,
            components: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// The registered components.
    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    /// The tallies of every `fit_partial` call, in order.
    pub fn chunks(&self) -> &[ChunkStats] {
        &self.chunks
    }

    fn check_binding(
        &self,
        binding: &ComponentBinding<'_>,
        rows: usize,
    ) -> Result<(), DryRunError> {
        let spec = self
            .components
            .iter()
            .find(|c| c.name == binding.name)
            .ok_or_else(|| DryRunError::UnknownComponent(binding.name.to_string()))?;

        if binding.ids.len() != rows {
            return Err(DryRunError::Misaligned {
                name: spec.name.clone(),
                rows,
                ids: binding.ids.len(),
            });
        }
        if let Some(&id) = binding.ids.iter().find(|&&id| id >= spec.cardinality) {
            return Err(DryRunError::CategoryOutOfRange {
                name: spec.name.clone(),
                id,
                cardinality: spec.cardinality,
            });
        }
        Ok(())
    }
}

impl TopicModel for DryRunModel {
    type Token = u32;
    type Error = DryRunError;

    fn add_component(
        &mut self,
        spec: &ComponentSpec,
    ) -> Result<(), Self::Error> {
        log::info!(
            "DryRunModel: component {:?} with {} categories, {} topics",
            spec.name,
            spec.cardinality,
            spec.n_topics
        );
        self.components.push(spec.clone());
        Ok(())
    }

    fn fit_partial(
        &mut self,
        chunk: TokenMatrixView<'_, u32>,
        _fraction: f64,
        components: &[ComponentBinding<'_>],
    ) -> Result<(), Self::Error> {
        for binding in components {
            self.check_binding(binding, chunk.n_rows())?;
        }

        let n_words = self.spec.n_words;
        if let Some(&token) = chunk
            .as_slice()
            .iter()
            .find(|&&t| t as usize >= n_words)
        {
            return Err(DryRunError::TokenOutOfRange { token, n_words });
        }

        let stats = ChunkStats {
            rows: chunk.n_rows(),
            tokens: chunk.count_non_pad(0),
        };
        log::debug!("DryRunModel: chunk {} {stats:?}", self.chunks.len());
        self.chunks.push(stats);
        Ok(())
    }
}
