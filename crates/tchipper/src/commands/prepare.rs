use std::io::Write;

use serde::Serialize;
use topichipper::tokenize::DocumentTokenizer;

use crate::{
    corpus_args::{CorpusArgs, FilterArgs, LoadedCorpus, load_corpus},
    input_output::OutputArgs,
    logging::LogArgs,
};

/// Args for the prepare command.
#[derive(clap::Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    filter: FilterArgs,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Include the per-document clean token rows in the report.
    #[arg(long)]
    rows: bool,

    #[command(flatten)]
    output: OutputArgs,
}

/// The JSON report of a prepared corpus.
#[derive(Debug, Serialize)]
struct CorpusReport {
    n_docs: usize,
    max_length: usize,
    n_words: usize,
    raw_tokens: usize,
    clean_tokens: usize,
    keys: Vec<u32>,
    counts: Vec<u64>,
    words: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<Vec<u32>>>,
}

impl CorpusReport {
    fn build(
        loaded: &LoadedCorpus,
        with_rows: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let prepared = &loaded.prepared;
        let (n_docs, max_length) = prepared.clean.shape();
        Ok(Self {
            n_docs,
            max_length,
            n_words: prepared.n_words(),
            raw_tokens: loaded.raw_tokens,
            clean_tokens: prepared.clean.count_non_pad(0),
            keys: prepared.keys.clone(),
            counts: prepared.counts.clone(),
            words: prepared.word_list(loaded.tokenizer.raw_vocab())?,
            rows: with_rows.then(|| prepared.clean.rows().map(|r| r.to_vec()).collect()),
        })
    }
}

impl PrepareArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let loaded = load_corpus(&self.corpus, &self.filter)?;
        let report = CorpusReport::build(&loaded, self.rows)?;
        log::info!(
            "Prepared {} documents: {} words, {} of {} tokens kept",
            report.n_docs,
            report.n_words - 1,
            report.clean_tokens,
            report.raw_tokens
        );

        let mut writer = self.output.open_writer()?;
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}
