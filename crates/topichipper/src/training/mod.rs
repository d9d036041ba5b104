//! # Topic Model Training
//!
//! The topic model itself is external; it plugs in through [`TopicModel`].
//! A [`TrainingDriver`] feeds it epochs of aligned `(token chunk, document ids)`
//! minibatches.
//!
//! ```rust
//! use topichipper::{
//!     TokenMatrix,
//!     matrix::TokenMatrixView,
//!     training::{ComponentBinding, ComponentSpec, TopicModel, TrainingDriverOptions},
//! };
//!
//! #[derive(Default)]
//! struct TokenCounter {
//!     tokens: usize,
//! }
//!
//! impl TopicModel for TokenCounter {
//!     type Token = u32;
//!     type Error = std::convert::Infallible;
//!
//!     fn add_component(&mut self, _spec: &ComponentSpec) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//!
//!     fn fit_partial(
//!         &mut self,
//!         chunk: TokenMatrixView<'_, u32>,
//!         _fraction: f64,
//!         _components: &[ComponentBinding<'_>],
//!     ) -> Result<(), Self::Error> {
//!         self.tokens += chunk.count_non_pad(0);
//!         Ok(())
//!     }
//! }
//!
//! let clean = TokenMatrix::<u32>::from_rows([vec![1, 2], vec![3], vec![]], 2, 0);
//! let doc_ids: Vec<usize> = (0..clean.n_rows()).collect();
//!
//! let driver = TrainingDriverOptions::default()
//!     .with_epochs(2)
//!     .with_chunk_size(Some(2))
//!     .init();
//!
//! let mut model = TokenCounter::default();
//! driver.register_components(&mut model, clean.n_rows())?;
//! driver.fit(&mut model, &clean, &doc_ids)?;
//! assert_eq!(model.tokens, 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod driver;
mod model;

#[doc(inline)]
pub use driver::{
    DOCUMENT_ID_COMPONENT,
    DriverError,
    TrainingDriver,
    TrainingDriverOptions,
    TrainingSummary,
};
#[doc(inline)]
pub use model::{ComponentBinding, ComponentSpec, ModelSpec, TopicModel};
