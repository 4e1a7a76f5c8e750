use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fdiff",
    about = "Filing diff: align two editions of a disclosure and tag what changed",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Align, sentence-align and tag two editions
    Run(RunArgs),
    /// Print the aligned section tree
    Align(AlignArgs),
    /// Tag a saved sentence-pair file
    Tag(TagArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Old edition, a JSON array of sections
    pub old: PathBuf,
    /// New edition, a JSON array of sections
    pub new: PathBuf,
    /// Ticker code used for artifact file names
    #[arg(long)]
    pub ticker: String,
    #[arg(long, default_value = "result")]
    pub result_dir: PathBuf,
    /// TOML tuning file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write intermediate artifacts under <RESULT_DIR>/<TICKER>/
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct AlignArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct TagArgs {
    /// Sentence pairs saved by `fdiff run --save`
    pub sentence_pairs: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}
