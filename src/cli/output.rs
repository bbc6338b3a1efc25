//! Output formatting for CLI commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cli::args::{MosaicArgs, OutputFormat};
use crate::error::Result;
use crate::ml::ClassificationReport;

/// Result of the `evaluate` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub train_documents: usize,
    pub test_documents: usize,
    pub n_features: usize,
    pub fit_duration_ms: u64,
    pub report: ClassificationReport,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trained on {} documents ({} features) in {}ms, evaluated on {}.",
            self.train_documents, self.n_features, self.fit_duration_ms, self.test_documents
        )?;
        writeln!(f)?;
        write!(f, "{}", self.report)
    }
}

/// Result of the `split` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct SplitResult {
    pub subject: String,
    pub body: String,
}

impl fmt::Display for SplitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject:{}", self.subject)?;
        writeln!(f, "───────")?;
        write!(f, "{}", self.body)
    }
}

/// One block of the fitted feature union.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockInfo {
    pub name: String,
    pub columns: usize,
    pub weight: f64,
}

/// Result of the `inspect` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct InspectionResult {
    pub documents: usize,
    pub total_columns: usize,
    pub sparse: bool,
    pub blocks: Vec<BlockInfo>,
}

impl fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .blocks
            .iter()
            .map(|b| b.name.len())
            .max()
            .unwrap_or(0)
            .max("block".len());

        writeln!(f, "{:<width$}  {:>8}  {:>6}", "block", "columns", "weight")?;
        for block in &self.blocks {
            writeln!(
                f,
                "{:<width$}  {:>8}  {:>6.2}",
                block.name, block.columns, block.weight
            )?;
        }
        write!(
            f,
            "{} documents x {} columns ({})",
            self.documents,
            self.total_columns,
            if self.sparse { "sparse" } else { "dense" }
        )
    }
}

/// Render a result in the requested format.
pub fn render<T: Serialize + fmt::Display>(result: &T, args: &MosaicArgs) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => Ok(result.to_string()),
        OutputFormat::Json if args.pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + fmt::Display>(
    message: &str,
    result: &T,
    args: &MosaicArgs,
) -> Result<()> {
    if args.output_format == OutputFormat::Human && args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    println!("{}", render(result, args)?);
    Ok(())
}
