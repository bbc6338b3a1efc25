use std::fs;

use clap::Parser;
use mosaic::cli::args::{Command, MosaicArgs, OutputFormat};
use mosaic::cli::commands::execute_command;
use mosaic::cli::output::{SplitResult, render};
use mosaic::document::DocumentSplitter;
use tempfile::TempDir;

fn write_corpus(root: &std::path::Path) {
    let categories = [
        ("comp.graphics", "render image", ["Pixels on the screen.", "A shaded image.", "Render the mesh."]),
        ("rec.autos", "engine car", ["The car engine runs.", "Fast cars on roads.", "Brakes and tires."]),
    ];
    for (name, subject, bodies) in categories {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        for (i, body) in bodies.iter().enumerate() {
            fs::write(dir.join(i.to_string()), format!("Subject: {subject}\n\n{body}")).unwrap();
        }
    }
    fs::write(
        root.join("config.json"),
        r#"{"subject_tfidf": {"min_df": 2}, "svd": {"n_components": 2}, "union": {"n_jobs": 1}}"#,
    )
    .unwrap();
}

#[test]
fn test_evaluate_command() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let root = dir.path().to_str().unwrap();
    let config = dir.path().join("config.json");

    let args = MosaicArgs::try_parse_from([
        "mosaic",
        "--quiet",
        "--format",
        "json",
        "evaluate",
        "--train",
        root,
        "--test",
        root,
        "--categories",
        "comp.graphics,rec.autos",
        "--config",
        config.to_str().unwrap(),
        "--shuffle-seed",
        "1",
    ])
    .unwrap();
    assert!(matches!(args.command, Command::Evaluate(_)));
    execute_command(args).unwrap();
}

#[test]
fn test_evaluate_unknown_category_fails() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let root = dir.path().to_str().unwrap();

    let args = MosaicArgs::try_parse_from([
        "mosaic", "-q", "evaluate", "--train", root, "--test", root, "--categories", "sci.med",
    ])
    .unwrap();
    assert!(execute_command(args).is_err());
}

#[test]
fn test_inspect_command() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let config = dir.path().join("config.json");

    let args = MosaicArgs::try_parse_from([
        "mosaic",
        "-q",
        "inspect",
        "--train",
        dir.path().to_str().unwrap(),
        "-c",
        config.to_str().unwrap(),
    ])
    .unwrap();
    execute_command(args).unwrap();
}

#[test]
fn test_split_command() {
    let dir = TempDir::new().unwrap();
    let post = dir.path().join("post.txt");
    fs::write(&post, "From: a@b\nSubject: Re: orbit\n\nIt works.\n> quoted").unwrap();

    let args = MosaicArgs::try_parse_from([
        "mosaic",
        "--format",
        "json",
        "split",
        post.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(args.output_format, OutputFormat::Json);

    let (subject, body) = DocumentSplitter::split(&fs::read_to_string(&post).unwrap());
    let rendered = render(&SplitResult { subject, body }, &args).unwrap();
    assert_eq!(rendered, r#"{"subject":" Re: orbit","body":"It works."}"#);

    execute_command(args).unwrap();
}

#[test]
fn test_split_missing_file() {
    let args = MosaicArgs::try_parse_from(["mosaic", "split", "/no/such/post.txt"]).unwrap();
    assert!(execute_command(args).is_err());
}
