use std::fs;
use std::io::Write;
use std::path::Path;

use mosaic::config::PipelineConfig;
use mosaic::dataset::Corpus;
use mosaic::ml::ClassificationPipeline;
use mosaic::pipeline::{BODY_BOW, BODY_STATS, Batch, SUBJECT, Step, Transformer};
use tempfile::{NamedTempFile, TempDir};

const SPACE_BODIES: [&str; 4] = [
    "The rocket reached orbit after launch.",
    "Orbit insertion of the shuttle worked.",
    "A rocket engine burns for the launch.",
    "The shuttle left orbit for the moon.",
];

const RELIGION_BODIES: [&str; 4] = [
    "The sermon spoke of god and faith.",
    "Faith in god is found in the bible.",
    "The bible tells of god and the church.",
    "A church sermon on faith and prayer.",
];

fn post(subject: &str, body: &str, quoted: bool) -> String {
    let quote = if quoted {
        "In article <1@host>, someone writes:\n> an old reply\n"
    } else {
        ""
    };
    format!("From: user@example.com\nSubject: {subject}\n\n{quote}{body}\n\n--\nsignature")
}

fn write_category(root: &Path, name: &str, subject: &str, bodies: &[&str]) {
    let dir = root.join(name);
    fs::create_dir(&dir).unwrap();
    for (i, body) in bodies.iter().enumerate() {
        fs::write(dir.join(format!("{}", 1000 + i)), post(subject, body, i % 2 == 0)).unwrap();
    }
}

fn corpus_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_category(dir.path(), "sci.space", "rocket launch", &SPACE_BODIES);
    write_category(dir.path(), "soc.religion", "god and faith", &RELIGION_BODIES);
    dir
}

fn small_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "subject_tfidf": {{"min_df": 2}},
            "svd": {{"n_components": 2, "seed": 7}},
            "union": {{"weights": {{"subject": 0.8, "body_bow": 0.5, "body_stats": 1.0}}, "n_jobs": 2}}
        }}"#
    )
    .unwrap();
    file
}

#[test]
fn test_train_and_evaluate_from_directories() {
    let train_dir = corpus_dir();
    let test_dir = corpus_dir();
    let config_file = small_config();

    let config = PipelineConfig::from_file(config_file.path()).unwrap();
    let train = Corpus::from_dir(train_dir.path(), None).unwrap();
    let test = Corpus::from_dir(test_dir.path(), Some(&train.target_names)).unwrap();
    assert_eq!(train.target_names, vec!["sci.space", "soc.religion"]);
    assert_eq!(train.class_counts(), vec![4, 4]);

    let mut model = ClassificationPipeline::from_config(&config).unwrap();
    model.fit(&train.documents, &train.labels).unwrap();

    let report = model
        .evaluate(&test.documents, &test.labels, &train.target_names)
        .unwrap();
    assert_eq!(report.classes.len(), 2);
    assert_eq!(report.support(), 8);
    assert!(report.class("sci.space").is_some());
    assert!(report.accuracy > 0.5);

    let text = report.to_string();
    assert!(text.contains("sci.space"));
    assert!(text.contains("accuracy"));
    assert!(text.contains("weighted avg"));
}

#[test]
fn test_union_blocks_after_fit() {
    let dir = corpus_dir();
    let config = PipelineConfig::from_file(small_config().path()).unwrap();
    let corpus = Corpus::from_dir(dir.path(), None).unwrap();

    let mut model = ClassificationPipeline::from_config(&config).unwrap();
    model.fit(&corpus.documents, &corpus.labels).unwrap();

    let Some(Step::Union(union)) = model.features().step("union") else {
        panic!("expected a union step");
    };
    let widths = union.block_widths().unwrap();
    let names: Vec<&str> = widths.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec![SUBJECT, BODY_BOW, BODY_STATS]);

    // Subject terms in at least two posts: and, faith, god, launch, rocket.
    assert_eq!(widths[0].1, 5);
    assert_eq!(widths[1].1, 2);
    assert_eq!(widths[2].1, 2);
    assert_eq!(union.weight(SUBJECT), 0.8);

    let x = model.features_of(&corpus.documents).unwrap();
    assert_eq!(x.shape(), (8, 9));

    let names = model.features().feature_names().unwrap();
    assert!(names.contains(&"subject__rocket".to_string()));
    assert!(names.contains(&"body_stats__length".to_string()));
}

#[test]
fn test_jsonl_corpus_with_unseen_category() {
    let mut train_file = NamedTempFile::new().unwrap();
    for body in SPACE_BODIES {
        let record = serde_json::json!({"text": post("rocket launch", body, false), "label": "space"});
        writeln!(train_file, "{record}").unwrap();
    }
    for body in RELIGION_BODIES {
        let record = serde_json::json!({"text": post("god and faith", body, false), "label": "religion"});
        writeln!(train_file, "{record}").unwrap();
    }

    let mut test_file = NamedTempFile::new().unwrap();
    let record = serde_json::json!({"text": post("rocket launch", SPACE_BODIES[0], false), "label": "space"});
    writeln!(test_file, "{record}").unwrap();
    let record = serde_json::json!({"text": post("autos", "A car", false), "label": "autos"});
    writeln!(test_file, "{record}").unwrap();

    let config = PipelineConfig::from_file(small_config().path()).unwrap();
    let train = Corpus::from_path(train_file.path(), None).unwrap();
    assert_eq!(train.target_names, vec!["religion", "space"]);

    // Records outside the training categories are dropped.
    let test = Corpus::from_path(test_file.path(), Some(&train.target_names)).unwrap();
    assert_eq!(test.len(), 1);
    assert_eq!(test.labels, vec![1]);

    let mut model = ClassificationPipeline::from_config(&config).unwrap();
    model.fit(&train.documents, &train.labels).unwrap();
    let report = model
        .evaluate(&test.documents, &test.labels, &train.target_names)
        .unwrap();
    assert_eq!(report.support(), 1);
    assert_eq!(report.class("space").unwrap().support, 1);
}

#[test]
fn test_transform_is_deterministic() {
    let dir = corpus_dir();
    let corpus = Corpus::from_dir(dir.path(), None).unwrap();
    let config = PipelineConfig::from_file(small_config().path()).unwrap();

    let fit = |n_jobs: usize| {
        let mut config = config.clone();
        config.union.n_jobs = n_jobs;
        let mut features = mosaic::pipeline::subject_body_features(&config).unwrap();
        features
            .fit_transform(&Batch::Texts(corpus.documents.clone()), Some(&corpus.labels))
            .unwrap()
            .into_matrix("test")
            .unwrap()
            .to_dense()
    };

    let sequential = fit(1);
    let parallel = fit(3);
    assert_eq!(sequential.dim(), parallel.dim());
    for (a, b) in sequential.iter().zip(parallel.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}
