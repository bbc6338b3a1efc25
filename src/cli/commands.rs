//! Command implementations for the Mosaic CLI.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PipelineConfig;
use crate::dataset::{Corpus, decode_text};
use crate::document::DocumentSplitter;
use crate::error::{MosaicError, Result};
use crate::ml::ClassificationPipeline;
use crate::pipeline::{Batch, FeatureUnion, Pipeline, Step, Transformer, subject_body_features};

/// Execute a CLI command.
pub fn execute_command(args: MosaicArgs) -> Result<()> {
    match &args.command {
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
        Command::Split(split_args) => split(split_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

fn load_config(path: Option<&Path>, cli_args: &MosaicArgs) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            if cli_args.verbosity() > 1 {
                println!("Loading config from: {}", path.display());
            }
            PipelineConfig::from_file(path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn categories(list: &[String]) -> Option<&[String]> {
    if list.is_empty() { None } else { Some(list) }
}

fn union_of(features: &Pipeline) -> Result<&FeatureUnion> {
    match features.step("union") {
        Some(Step::Union(union)) => Ok(union),
        _ => Err(MosaicError::other("feature pipeline has no union step")),
    }
}

/// Train on one corpus, then report on another.
pub fn evaluate(args: &EvaluateArgs, cli_args: &MosaicArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), cli_args)?;

    let mut train = Corpus::from_path(&args.train, categories(&args.categories))?;
    if train.is_empty() {
        return Err(MosaicError::invalid_input(format!(
            "no training documents in {}",
            args.train.display()
        )));
    }
    if let Some(seed) = args.shuffle_seed {
        train.shuffle(seed);
    }
    // Test labels must index the same category list as training labels.
    let test = Corpus::from_path(&args.test, Some(&train.target_names))?;

    let mut model = ClassificationPipeline::from_config(&config)?;
    let start = Instant::now();
    model.fit(&train.documents, &train.labels)?;
    let fit_duration = start.elapsed();
    info!("fitted pipeline in {fit_duration:?}");

    let n_features = union_of(model.features())?
        .block_widths()
        .map(|widths| widths.iter().map(|(_, width)| width).sum())
        .unwrap_or(0);

    let report = model.evaluate(&test.documents, &test.labels, &train.target_names)?;

    output_result(
        "Evaluation complete",
        &EvaluationResult {
            train_documents: train.len(),
            test_documents: test.len(),
            n_features,
            fit_duration_ms: fit_duration.as_millis() as u64,
            report,
        },
        cli_args,
    )
}

/// Show the subject and body extracted from one raw post.
pub fn split(args: &SplitArgs, cli_args: &MosaicArgs) -> Result<()> {
    let text = decode_text(fs::read(&args.file)?);
    let (subject, body) = DocumentSplitter::split(&text);

    output_result(
        &format!("Split {}", args.file.display()),
        &SplitResult { subject, body },
        cli_args,
    )
}

/// Fit the feature union and report the width and weight of each block.
pub fn inspect(args: &InspectArgs, cli_args: &MosaicArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), cli_args)?;
    config.validate()?;

    let corpus = Corpus::from_path(&args.train, categories(&args.categories))?;
    let mut features = subject_body_features(&config)?;
    let matrix = features
        .fit_transform(&Batch::Texts(corpus.documents.clone()), Some(&corpus.labels))?
        .into_matrix("inspect")?;

    let union = union_of(&features)?;
    let blocks = union
        .block_widths()
        .unwrap_or_default()
        .into_iter()
        .map(|(name, columns)| BlockInfo {
            weight: union.weight(&name),
            name,
            columns,
        })
        .collect();

    output_result(
        "Feature union fitted",
        &InspectionResult {
            documents: corpus.len(),
            total_columns: matrix.n_cols(),
            sparse: matrix.is_sparse(),
            blocks,
        },
        cli_args,
    )
}
