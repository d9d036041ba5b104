mod prepare;
mod train;

/// Subcommands for tchipper
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Tokenize, compact, and filter a corpus; write a JSON report.
    Prepare(prepare::PrepareArgs),

    /// Prepare a corpus, then run the training driver against a dry-run model.
    Train(train::TrainArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Prepare(cmd) => cmd.run(),
            Commands::Train(cmd) => cmd.run(),
        }
    }
}
