use std::io::{BufRead, BufReader};

use arrow::array::{Array, StringArray};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use topichipper::{
    filter::DEFAULT_SUBSAMPLE_THRESHOLD,
    pipeline::{CorpusPipelineOptions, PreparedCorpus},
    tokenize::{DEFAULT_WORD_PATTERN, DocumentTokenizer, RegexTokenizer, RegexTokenizerOptions},
};

/// File formats for corpus input.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FileFormat {
    /// Text files; one document per line.
    Text,

    /// Parquet files; one document per row of the `text` column.
    Parquet,
}

/// Corpus input and tokenizer arg group.
#[derive(clap::Args, Debug)]
pub struct CorpusArgs {
    /// Input files.
    #[arg(required = true)]
    files: Vec<String>,

    /// Input file format.
    #[arg(long, default_value = "text")]
    input_format: FileFormat,

    /// Token columns per document; longer documents are truncated.
    #[arg(long, default_value = "10000")]
    max_length: usize,

    /// Word span regex.
    #[arg(long, default_value_t = DEFAULT_WORD_PATTERN.to_string())]
    regex: String,

    /// Keep word case.
    #[arg(long)]
    keep_case: bool,
}

impl CorpusArgs {
    /// Read every document of every input file, in order.
    pub fn read_documents(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let mut docs = Vec::new();

        log::info!("Reading shards:");
        for (idx, path) in self.files.iter().enumerate() {
            log::info!("{idx}: {path}");
            match self.input_format {
                FileFormat::Text => read_text_file(path, &mut docs)?,
                FileFormat::Parquet => read_parquet_file(path, &mut docs)?,
            }
        }
        log::info!("Read {} documents", docs.len());

        Ok(docs)
    }

    /// Build the regex tokenizer.
    pub fn tokenizer(&self) -> Result<RegexTokenizer<u32>, Box<dyn std::error::Error>> {
        Ok(RegexTokenizerOptions::new(self.max_length)
            .with_pattern(self.regex.clone())
            .with_lowercase(!self.keep_case)
            .init()?)
    }
}

fn read_text_file(
    path: &str,
    docs: &mut Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    for line in reader.lines() {
        docs.push(line?);
    }
    Ok(())
}

fn read_parquet_file(
    path: &str,
    docs: &mut Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    for batch in reader {
        let batch = batch?;

        let column = batch
            .column_by_name("text")
            .ok_or_else(|| format!("{path}: no 'text' column"))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| format!("{path}: 'text' column is not a string column"))?;

        docs.extend(column.iter().map(|s| s.unwrap_or_default().to_string()));
    }
    Ok(())
}

/// Vocabulary filter arg group.
#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// Mask words seen fewer times than this; 0 disables.
    #[arg(long, default_value = "5")]
    min_count: u64,

    /// Mask words seen more times than this; 0 disables.
    #[arg(long, default_value = "0")]
    max_count: u64,

    /// Frequent-word subsampling threshold.
    #[arg(long, default_value_t = DEFAULT_SUBSAMPLE_THRESHOLD)]
    threshold: f64,

    /// Skip frequent-word subsampling.
    #[arg(long)]
    no_subsample: bool,

    /// Subsampling rng seed.
    #[arg(long, default_value = "0")]
    seed: u64,
}

impl FilterArgs {
    /// The pipeline options for these args.
    pub fn pipeline_options(&self) -> CorpusPipelineOptions<u32, u64> {
        CorpusPipelineOptions::default()
            .with_min_count(self.min_count)
            .with_max_count(self.max_count)
            .with_subsample_threshold((!self.no_subsample).then_some(self.threshold))
            .with_seed(self.seed)
    }
}

/// A tokenized and prepared corpus.
pub struct LoadedCorpus {
    /// The tokenizer, holding the raw vocabulary.
    pub tokenizer: RegexTokenizer<u32>,

    /// The number of non-pad tokens before filtering.
    pub raw_tokens: usize,

    /// The prepared corpus.
    pub prepared: PreparedCorpus<u32, u64>,
}

/// Read, tokenize, and prepare a corpus.
pub fn load_corpus(
    corpus: &CorpusArgs,
    filter: &FilterArgs,
) -> Result<LoadedCorpus, Box<dyn std::error::Error>> {
    let docs = corpus.read_documents()?;

    let mut tokenizer = corpus.tokenizer()?;
    let raw = tokenizer.tokenize_batch(&docs)?;
    log::info!(
        "Tokenized {} documents; {} raw words",
        raw.n_rows(),
        tokenizer.raw_vocab().len()
    );

    let prepared = filter.pipeline_options().init().prepare(&raw)?;

    Ok(LoadedCorpus {
        raw_tokens: raw.count_non_pad(tokenizer.pad()),
        tokenizer,
        prepared,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write, sync::Arc};

    use arrow::{
        datatypes::{DataType, Field, Schema},
        record_batch::RecordBatch,
    };
    use parquet::arrow::ArrowWriter;
    use tempdir::TempDir;

    use super::*;

    fn corpus_args(
        files: Vec<String>,
        input_format: FileFormat,
    ) -> CorpusArgs {
        CorpusArgs {
            files,
            input_format,
            max_length: 8,
            regex: DEFAULT_WORD_PATTERN.to_string(),
            keep_case: false,
        }
    }

    #[test]
    fn test_read_text_documents() -> Result<(), Box<dyn std::error::Error>> {
        let tmpdir = TempDir::new("tchipper-text-test")?;
        let a = tmpdir.path().join("a.txt");
        let b = tmpdir.path().join("b.txt");
        writeln!(File::create(&a)?, "first doc\nsecond doc")?;
        writeln!(File::create(&b)?, "third doc")?;

        let args = corpus_args(
            vec![
                a.to_string_lossy().to_string(),
                b.to_string_lossy().to_string(),
            ],
            FileFormat::Text,
        );
        assert_eq!(
            args.read_documents()?,
            vec!["first doc", "second doc", "third doc"]
        );
        Ok(())
    }

    #[test]
    fn test_read_parquet_documents() -> Result<(), Box<dyn std::error::Error>> {
        let tmpdir = TempDir::new("tchipper-parquet-test")?;
        let path = tmpdir.path().join("shard.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new("text", DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec![
                Some("alpha beta"),
                None,
                Some("gamma"),
            ]))],
        )?;
        let mut writer = ArrowWriter::try_new(File::create(&path)?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let args = corpus_args(
            vec![path.to_string_lossy().to_string()],
            FileFormat::Parquet,
        );
        assert_eq!(args.read_documents()?, vec!["alpha beta", "", "gamma"]);
        Ok(())
    }

    #[test]
    fn test_pipeline_options() {
        let args = FilterArgs {
            min_count: 2,
            max_count: 100,
            threshold: 1e-3,
            no_subsample: true,
            seed: 9,
        };
        let options = args.pipeline_options();
        assert_eq!(options.min_count, 2);
        assert_eq!(options.max_count, 100);
        assert_eq!(options.subsample_threshold, None);
        assert_eq!(options.seed, 9);
    }

    #[test]
    fn test_load_corpus() -> Result<(), Box<dyn std::error::Error>> {
        let tmpdir = TempDir::new("tchipper-load-test")?;
        let path = tmpdir.path().join("docs.txt");
        writeln!(File::create(&path)?, "a b a\nb a c\n\nc c")?;

        let corpus = corpus_args(vec![path.to_string_lossy().to_string()], FileFormat::Text);
        let filter = FilterArgs {
            min_count: 2,
            max_count: 0,
            threshold: DEFAULT_SUBSAMPLE_THRESHOLD,
            no_subsample: true,
            seed: 0,
        };

        let loaded = load_corpus(&corpus, &filter)?;
        assert_eq!(loaded.prepared.n_docs(), 4);
        assert_eq!(loaded.raw_tokens, 8);
        assert_eq!(
            loaded.prepared.word_list(loaded.tokenizer.raw_vocab())?,
            vec!["<pad>", "a", "c", "b"]
        );
        Ok(())
    }
}
