//! The subject/body feature pipeline for newsgroup posts.

use crate::config::PipelineConfig;
use crate::document::{BODY_FIELD, DocumentSplitter, SUBJECT_FIELD};
use crate::error::Result;
use crate::features::{DictVectorizer, TextStats, TfidfVectorizer, TruncatedSvd};
use crate::pipeline::pipeline::Pipeline;
use crate::pipeline::selector::FieldSelector;
use crate::pipeline::step::Step;
use crate::pipeline::union::FeatureUnion;

/// Union member: TF-IDF over the subject line.
pub const SUBJECT: &str = "subject";

/// Union member: TF-IDF over the body reduced by truncated SVD.
pub const BODY_BOW: &str = "body_bow";

/// Union member: length and sentence count of the body.
pub const BODY_STATS: &str = "body_stats";

fn named(name: &str, step: impl Into<Step>) -> (String, Step) {
    (name.to_string(), step.into())
}

/// Raw posts → `subjectbody` splitter → `union` of the three feature blocks.
///
/// ```text
/// subject:    selector(subject) → tfidf
/// body_bow:   selector(body)    → tfidf → svd
/// body_stats: selector(body)    → stats → dict
/// ```
pub fn subject_body_features(config: &PipelineConfig) -> Result<Pipeline> {
    let subject = Pipeline::new(vec![
        named("selector", FieldSelector::new(SUBJECT_FIELD)),
        named("tfidf", TfidfVectorizer::new(config.subject_tfidf.clone())?),
    ])?;

    let body_bow = Pipeline::new(vec![
        named("selector", FieldSelector::new(BODY_FIELD)),
        named("tfidf", TfidfVectorizer::new(config.body_tfidf.clone())?),
        named("svd", TruncatedSvd::new(config.svd.clone())),
    ])?;

    let body_stats = Pipeline::new(vec![
        named("selector", FieldSelector::new(BODY_FIELD)),
        named("stats", TextStats::new()),
        named("vect", DictVectorizer::new()),
    ])?;

    let union = FeatureUnion::new(
        vec![
            named(SUBJECT, subject),
            named(BODY_BOW, body_bow),
            named(BODY_STATS, body_stats),
        ],
        config.union.clone(),
    )?;

    Pipeline::new(vec![
        named("subjectbody", DocumentSplitter::new()),
        named("union", union),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{SvdConfig, TfidfConfig};
    use crate::pipeline::batch::Batch;
    use crate::pipeline::transformer::Transformer;

    fn posts() -> Vec<String> {
        vec![
            "Subject: god and man\n\nIs there a god. I think so.".to_string(),
            "Subject: god is real\n\nIn article <1>, bob writes:\n> no\nYes god is real.".to_string(),
            "Subject: galaxy orbit\n\nThe orbit decays.\n\n--\nsig".to_string(),
            "Subject: orbit of moon\n\nMoon orbit is stable".to_string(),
        ]
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            subject_tfidf: TfidfConfig::default().min_df(2),
            svd: SvdConfig::default().n_components(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_block_layout() {
        let mut pipeline = subject_body_features(&config()).unwrap();
        let out = pipeline
            .fit_transform(&Batch::Texts(posts()), None)
            .unwrap()
            .into_matrix("test")
            .unwrap();

        // subject vocabulary with min_df 2: god, orbit.
        assert_eq!(out.shape(), (4, 2 + 2 + 2));
        assert!(out.is_sparse());

        let Some(Step::Union(union)) = pipeline.step("union") else {
            panic!("expected a union step");
        };
        assert_eq!(
            union.block_widths().unwrap(),
            vec![
                (SUBJECT.to_string(), 2),
                (BODY_BOW.to_string(), 2),
                (BODY_STATS.to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_weights_are_applied() {
        let mut pipeline = subject_body_features(&config()).unwrap();
        let out = pipeline
            .fit_transform(&Batch::Texts(posts()), None)
            .unwrap()
            .into_matrix("test")
            .unwrap();

        // Last two columns: body length and period count, weight 1.0.
        // Body of the second post after quote removal is "Yes god is real.".
        assert_eq!(out.get(1, 4), "Yes god is real.".chars().count() as f64);
        assert_eq!(out.get(1, 5), 1.0);

        // Unit-norm subject rows scaled by 0.8.
        let subject_norm: f64 = (0..2).map(|c| out.get(0, c).powi(2)).sum::<f64>().sqrt();
        assert!((subject_norm - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_default_config_requires_frequent_subject_terms() {
        let mut pipeline = subject_body_features(&PipelineConfig::default()).unwrap();
        assert!(pipeline.fit(&Batch::Texts(posts()), None).is_err());
    }
}
