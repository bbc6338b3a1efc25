//! Command line argument parsing for the Mosaic CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Mosaic - feature-union text classification
#[derive(Parser, Debug, Clone)]
#[command(name = "mosaic")]
#[command(about = "Combine heterogeneous text features and evaluate a linear classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MosaicArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MosaicArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train on one corpus and print a classification report for another
    Evaluate(EvaluateArgs),

    /// Show how a raw post splits into subject and body
    Split(SplitArgs),

    /// Fit the feature union and show the width of each block
    Inspect(InspectArgs),
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Training corpus: a directory of category directories or a JSONL file
    #[arg(long, value_name = "DIR|FILE")]
    pub train: PathBuf,

    /// Test corpus, same layout as the training corpus
    #[arg(long, value_name = "DIR|FILE")]
    pub test: PathBuf,

    /// Categories to load (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Shuffle the training corpus with this seed before fitting
    #[arg(long)]
    pub shuffle_seed: Option<u64>,
}

/// Arguments for splitting a post
#[derive(Parser, Debug, Clone)]
pub struct SplitArgs {
    /// Raw post to split
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for inspecting the feature union
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Corpus to fit on: a directory of category directories or a JSONL file
    #[arg(long, value_name = "DIR|FILE")]
    pub train: PathBuf,

    /// Categories to load (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Output formats supported by the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}
