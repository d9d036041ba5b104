//! # Training Driver

use crate::chunks::chunk_pairs;
use crate::errors::{CorpusError, CorpusResult};
use crate::matrix::TokenMatrix;
use crate::training::{ComponentBinding, ComponentSpec, TopicModel};

/// The default name of the document id component.
pub const DOCUMENT_ID_COMPONENT: &str = "document id";

/// Errors from [`TrainingDriver`] runs.
#[derive(Debug, thiserror::Error)]
pub enum DriverError<E> {
    /// The corpus or the driver options were rejected.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// The model failed; the error is passed through as-is.
    #[error(transparent)]
    Model(E),
}

/// Options for [`TrainingDriver`].
#[derive(Debug, Clone)]
pub struct TrainingDriverOptions {
    /// The number of passes over the corpus.
    pub epochs: usize,

    /// The fraction of the corpus per chunk; passed to the model.
    pub fraction: f64,

    /// Explicit rows per chunk.
    ///
    /// When `None`, this is `floor(n_docs * fraction)`.
    pub chunk_size: Option<usize>,

    /// The number of topics of the document id component.
    pub n_topics: usize,

    /// The name of the document id component.
    pub component_name: String,
}

impl Default for TrainingDriverOptions {
    fn default() -> Self {
        Self {
            epochs: 5,
            fraction: 0.01,
            chunk_size: None,
            n_topics: 10,
            component_name: DOCUMENT_ID_COMPONENT.to_string(),
        }
    }
}

impl TrainingDriverOptions {
    /// Sets the number of epochs.
    pub fn with_epochs(
        self,
        epochs: usize,
    ) -> Self {
        Self { epochs, ..self }
    }

    /// Sets the chunk fraction.
    pub fn with_fraction(
        self,
        fraction: f64,
    ) -> Self {
        Self { fraction, ..self }
    }

    /// Sets an explicit chunk size.
    pub fn with_chunk_size(
        self,
        chunk_size: Option<usize>,
    ) -> Self {
        Self { chunk_size, ..self }
    }

    /// Sets the number of topics.
    pub fn with_n_topics(
        self,
        n_topics: usize,
    ) -> Self {
        Self { n_topics, ..self }
    }

    /// Sets the document id component name.
    pub fn with_component_name<S: Into<String>>(
        self,
        component_name: S,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            ..self
        }
    }

    /// Initializes a [`TrainingDriver`] from these options.
    pub fn init(self) -> TrainingDriver {
        TrainingDriver::new(self)
    }
}

/// Totals of a [`TrainingDriver::fit`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingSummary {
    /// Epochs completed.
    pub epochs: usize,

    /// `fit_partial` calls made.
    pub chunks: usize,

    /// Rows fed, summed over epochs.
    pub rows: usize,
}

/// Drives epochs of chunked `fit_partial` calls against a [`TopicModel`].
///
/// The driver holds no model state.
#[derive(Debug, Clone)]
pub struct TrainingDriver {
    /// Driver options.
    pub options: TrainingDriverOptions,
}

impl TrainingDriver {
    /// Create a new driver.
    pub fn new(options: TrainingDriverOptions) -> Self {
        Self { options }
    }

    /// Resolve the rows per chunk for a corpus of `n_docs` documents.
    ///
    /// ## Returns
    /// The chunk size; or an invalid-parameter error if the fraction is
    /// outside `(0, 1]` or the chunk size resolves to zero.
    pub fn chunk_size(
        &self,
        n_docs: usize,
    ) -> CorpusResult<usize> {
        let fraction = self.options.fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(CorpusError::invalid_parameter("fraction", fraction));
        }
        let chunk_size = match self.options.chunk_size {
            Some(chunk_size) => chunk_size,
            None => (n_docs as f64 * fraction).floor() as usize,
        };
        if chunk_size == 0 {
            return Err(CorpusError::invalid_parameter("chunk_size", chunk_size));
        }
        Ok(chunk_size)
    }

    /// The document id component registration for `n_docs` documents.
    pub fn component_spec(
        &self,
        n_docs: usize,
    ) -> ComponentSpec {
        ComponentSpec {
            name: self.options.component_name.clone(),
            cardinality: n_docs,
            n_topics: self.options.n_topics,
        }
    }

    /// Register the document id component with the model.
    pub fn register_components<M: TopicModel>(
        &self,
        model: &mut M,
        n_docs: usize,
    ) -> Result<(), DriverError<M::Error>> {
        model
            .add_component(&self.component_spec(n_docs))
            .map_err(DriverError::Model)
    }

    /// Run all epochs.
    ///
    /// Every chunk of `(clean, doc_ids)` is passed to
    /// [`TopicModel::fit_partial`] with the configured fraction and a
    /// document id [`ComponentBinding`]. Model errors abort the run.
    ///
    /// ## Arguments
    /// * `model` - the model to feed.
    /// * `clean` - the cleaned compact token matrix.
    /// * `doc_ids` - one document id per matrix row.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, model, clean, doc_ids)))]
    pub fn fit<M: TopicModel>(
        &self,
        model: &mut M,
        clean: &TokenMatrix<M::Token>,
        doc_ids: &[usize],
    ) -> Result<TrainingSummary, DriverError<M::Error>> {
        let chunk_size = self.chunk_size(clean.n_rows())?;
        let fraction = self.options.fraction;
        let name = self.options.component_name.as_str();

        // Validate alignment up front, so a mismatch fails before any model call.
        let n_chunks = chunk_pairs(chunk_size, clean, doc_ids)?.len();
        log::info!(
            "Training: {} epochs x {n_chunks} chunks of {chunk_size} rows",
            self.options.epochs
        );

        let mut summary = TrainingSummary::default();
        for epoch in 0..self.options.epochs {
            for (idx, (chunk, ids)) in chunk_pairs(chunk_size, clean, doc_ids)?.enumerate() {
                log::debug!("epoch {epoch}: chunk {idx}/{n_chunks} ({} rows)", ids.len());
                model
                    .fit_partial(chunk, fraction, &[ComponentBinding { name, ids }])
                    .map_err(DriverError::Model)?;
                summary.chunks += 1;
                summary.rows += ids.len();
            }
            summary.epochs += 1;
            log::info!("Finished epoch {}/{}", epoch + 1, self.options.epochs);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::TokenMatrixView;

    #[derive(Debug, PartialEq)]
    struct Call {
        rows: Vec<Vec<u32>>,
        fraction: f64,
        name: String,
        ids: Vec<usize>,
    }

    #[derive(Default)]
    struct RecordingModel {
        components: Vec<ComponentSpec>,
        calls: Vec<Call>,
        fail_on_call: Option<usize>,
    }

    #[derive(Debug)]
    struct ModelFailure(usize);

    impl TopicModel for RecordingModel {
        type Token = u32;
        type Error = ModelFailure;

        fn add_component(
            &mut self,
            spec: &ComponentSpec,
        ) -> Result<(), Self::Error> {
            self.components.push(spec.clone());
            Ok(())
        }

        fn fit_partial(
            &mut self,
            chunk: TokenMatrixView<'_, u32>,
            fraction: f64,
            components: &[ComponentBinding<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail_on_call == Some(self.calls.len()) {
                return Err(ModelFailure(self.calls.len()));
            }
            assert_eq!(components.len(), 1);
            self.calls.push(Call {
                rows: chunk.rows().map(|r| r.to_vec()).collect(),
                fraction,
                name: components[0].name.to_string(),
                ids: components[0].ids.to_vec(),
            });
            Ok(())
        }
    }

    fn corpus() -> (TokenMatrix<u32>, Vec<usize>) {
        let clean = TokenMatrix::from_rows([[1, 0], [2, 2], [0, 0], [3, 1], [1, 1]], 2, 0);
        let doc_ids = (0..clean.n_rows()).collect();
        (clean, doc_ids)
    }

    #[test]
    fn test_chunk_size() {
        let driver = TrainingDriverOptions::default().with_fraction(0.25).init();
        assert_eq!(driver.chunk_size(10).unwrap(), 2);
        assert!(matches!(
            driver.chunk_size(3),
            Err(CorpusError::InvalidParameter {
                name: "chunk_size",
                ..
            })
        ));

        let driver = driver.options.with_chunk_size(Some(7)).init();
        assert_eq!(driver.chunk_size(3).unwrap(), 7);

        for fraction in [0.0, -0.5, 1.5, f64::NAN] {
            let driver = TrainingDriverOptions::default().with_fraction(fraction).init();
            assert!(matches!(
                driver.chunk_size(100),
                Err(CorpusError::InvalidParameter {
                    name: "fraction",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_fit() {
        let (clean, doc_ids) = corpus();
        let driver = TrainingDriverOptions::default()
            .with_epochs(2)
            .with_fraction(0.4)
            .with_n_topics(3)
            .init();

        let mut model = RecordingModel::default();
        driver.register_components(&mut model, clean.n_rows()).unwrap();
        assert_eq!(
            model.components,
            vec![ComponentSpec {
                name: "document id".to_string(),
                cardinality: 5,
                n_topics: 3,
            }]
        );

        let summary = driver.fit(&mut model, &clean, &doc_ids).unwrap();
        assert_eq!(
            summary,
            TrainingSummary {
                epochs: 2,
                chunks: 6,
                rows: 10,
            }
        );

        let ids: Vec<Vec<usize>> = model.calls.iter().map(|c| c.ids.clone()).collect();
        assert_eq!(
            ids,
            vec![
                vec![0, 1],
                vec![2, 3],
                vec![4],
                vec![0, 1],
                vec![2, 3],
                vec![4],
            ]
        );
        assert_eq!(model.calls[1].rows, vec![vec![0, 0], vec![3, 1]]);
        assert!(model.calls.iter().all(|c| c.fraction == 0.4));
        assert!(model.calls.iter().all(|c| c.name == "document id"));
    }

    #[test]
    fn test_fit_misaligned() {
        let (clean, _) = corpus();
        let driver = TrainingDriverOptions::default().with_chunk_size(Some(2)).init();

        let mut model = RecordingModel::default();
        let err = driver.fit(&mut model, &clean, &[0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            DriverError::Corpus(CorpusError::ShapeMismatch { .. })
        ));
        assert!(model.calls.is_empty());
    }

    #[test]
    fn test_fit_propagates_model_error() {
        let (clean, doc_ids) = corpus();
        let driver = TrainingDriverOptions::default().with_chunk_size(Some(2)).init();

        let mut model = RecordingModel {
            fail_on_call: Some(4),
            ..Default::default()
        };
        let err = driver.fit(&mut model, &clean, &doc_ids).unwrap_err();
        match err {
            DriverError::Model(ModelFailure(call)) => assert_eq!(call, 4),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(model.calls.len(), 4);
    }

    #[test]
    fn test_zero_epochs() {
        let (clean, doc_ids) = corpus();
        let driver = TrainingDriverOptions::default()
            .with_epochs(0)
            .with_chunk_size(Some(2))
            .init();

        let mut model = RecordingModel::default();
        let summary = driver.fit(&mut model, &clean, &doc_ids).unwrap();
        assert_eq!(summary, TrainingSummary::default());
        assert!(model.calls.is_empty());
    }
}
