use std::io::Write;

use serde::Serialize;
use topichipper::training::{DOCUMENT_ID_COMPONENT, TrainingDriverOptions, TrainingSummary};

use crate::{
    corpus_args::{CorpusArgs, FilterArgs, load_corpus},
    dry_run::{ChunkStats, DryRunModel},
    input_output::OutputArgs,
    logging::LogArgs,
};

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    filter: FilterArgs,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Passes over the corpus.
    #[arg(long, default_value = "5")]
    epochs: usize,

    /// Fraction of the corpus per chunk.
    #[arg(long, default_value = "0.01")]
    fraction: f64,

    /// Explicit rows per chunk; overrides the fraction-derived size.
    #[arg(long, default_value = None)]
    chunk_size: Option<usize>,

    /// Topics of the document id component.
    #[arg(long, default_value = "10")]
    n_topics: usize,

    /// Word vector dimension.
    #[arg(long, default_value = "128")]
    n_hidden: usize,

    #[command(flatten)]
    output: OutputArgs,
}

/// The JSON report of a dry training run.
#[derive(Debug, Serialize)]
struct TrainReport {
    n_docs: usize,
    n_words: usize,
    n_topics: usize,
    chunk_size: usize,
    epochs: usize,
    chunks: usize,
    rows: usize,
    per_chunk: Vec<ChunkStats>,
}

impl TrainArgs {
    fn driver_options(&self) -> TrainingDriverOptions {
        TrainingDriverOptions::default()
            .with_epochs(self.epochs)
            .with_fraction(self.fraction)
            .with_chunk_size(self.chunk_size)
            .with_n_topics(self.n_topics)
            .with_component_name(DOCUMENT_ID_COMPONENT)
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let loaded = load_corpus(&self.corpus, &self.filter)?;
        let prepared = &loaded.prepared;

        let driver = self.driver_options().init();
        let chunk_size = driver.chunk_size(prepared.n_docs())?;

        let mut model = DryRunModel::new(prepared.model_spec(self.n_hidden));
        driver.register_components(&mut model, prepared.n_docs())?;
        log::info!("Registered {} components", model.components().len());

        log::info!("Training...");
        let TrainingSummary {
            epochs,
            chunks,
            rows,
        } = driver.fit(&mut model, &prepared.clean, &prepared.doc_ids())?;
        log::info!("Trained {epochs} epochs: {chunks} chunks, {rows} rows");

        let report = TrainReport {
            n_docs: prepared.n_docs(),
            n_words: prepared.n_words(),
            n_topics: self.n_topics,
            chunk_size,
            epochs,
            chunks,
            rows,
            per_chunk: model.chunks().to_vec(),
        };

        let mut writer = self.output.open_writer()?;
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}
