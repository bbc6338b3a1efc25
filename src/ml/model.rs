//! Feature pipeline plus classifier, trained and applied as one unit.

use log::info;

use crate::config::PipelineConfig;
use crate::error::{MosaicError, Result};
use crate::matrix::FeatureMatrix;
use crate::ml::metrics::{ClassificationReport, classification_report};
use crate::ml::svm::LinearSvc;
use crate::pipeline::{Batch, Pipeline, Transformer, subject_body_features};

/// Raw documents in, class labels out.
#[derive(Debug)]
pub struct ClassificationPipeline {
    features: Pipeline,
    classifier: LinearSvc,
}

impl ClassificationPipeline {
    /// Combine a feature pipeline ending in a matrix with a classifier.
    pub fn new(features: Pipeline, classifier: LinearSvc) -> Self {
        Self {
            features,
            classifier,
        }
    }

    /// The subject/body feature union followed by a linear SVM.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            subject_body_features(config)?,
            LinearSvc::new(config.svc.clone()),
        ))
    }

    fn to_matrix(batch: Batch) -> Result<FeatureMatrix> {
        batch.into_matrix("classifier")
    }

    /// Fit the feature pipeline and the classifier on labelled documents.
    pub fn fit(&mut self, documents: &[String], labels: &[usize]) -> Result<()> {
        if documents.len() != labels.len() {
            return Err(MosaicError::shape(format!(
                "{} documents with {} labels",
                documents.len(),
                labels.len()
            )));
        }

        let input = Batch::Texts(documents.to_vec());
        let x = Self::to_matrix(self.features.fit_transform(&input, Some(labels))?)?;
        info!(
            "training classifier on {} x {} feature matrix",
            x.n_rows(),
            x.n_cols()
        );
        self.classifier.fit(&x, labels)
    }

    /// Feature matrix for documents, using the fitted feature pipeline.
    pub fn features_of(&self, documents: &[String]) -> Result<FeatureMatrix> {
        Self::to_matrix(self.features.transform(&Batch::Texts(documents.to_vec()))?)
    }

    /// Predict a label for every document.
    pub fn predict(&self, documents: &[String]) -> Result<Vec<usize>> {
        let x = self.features_of(documents)?;
        self.classifier.predict(&x)
    }

    /// Predict and compare against known labels.
    pub fn evaluate(
        &self,
        documents: &[String],
        labels: &[usize],
        target_names: &[String],
    ) -> Result<ClassificationReport> {
        let predicted = self.predict(documents)?;
        classification_report(labels, &predicted, target_names)
    }

    /// The feature pipeline.
    pub fn features(&self) -> &Pipeline {
        &self.features
    }

    /// The classifier.
    pub fn classifier(&self) -> &LinearSvc {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentSplitter;
    use crate::features::{DictVectorizer, TextStats, TfidfConfig, TfidfVectorizer};
    use crate::ml::svm::SvcConfig;
    use crate::pipeline::FieldSelector;

    fn corpus() -> (Vec<String>, Vec<usize>) {
        let mut docs = Vec::new();
        let mut labels = Vec::new();
        for i in 0..6 {
            docs.push(format!(
                "Subject: rocket launch {i}\n\nThe orbit of the shuttle and the rocket."
            ));
            labels.push(0);
            docs.push(format!(
                "Subject: church sermon {i}\n\nGod and faith and the bible. Amen."
            ));
            labels.push(1);
        }
        (docs, labels)
    }

    fn small_pipeline() -> ClassificationPipeline {
        let features = Pipeline::new(vec![
            ("subjectbody".to_string(), DocumentSplitter::new().into()),
            (
                "body".to_string(),
                Pipeline::new(vec![
                    ("selector".to_string(), FieldSelector::new("body").into()),
                    (
                        "tfidf".to_string(),
                        TfidfVectorizer::new(TfidfConfig::default()).unwrap().into(),
                    ),
                ])
                .unwrap()
                .into(),
            ),
        ])
        .unwrap();
        ClassificationPipeline::new(features, LinearSvc::new(SvcConfig::default()))
    }

    #[test]
    fn test_fit_predict() {
        let (docs, labels) = corpus();
        let mut model = small_pipeline();
        model.fit(&docs, &labels).unwrap();

        let unseen = vec![
            "Subject: hi\n\nthe shuttle reached orbit".to_string(),
            "Subject: hi\n\nfaith in god".to_string(),
        ];
        assert_eq!(model.predict(&unseen).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_evaluate_report() {
        let (docs, labels) = corpus();
        let mut model = small_pipeline();
        model.fit(&docs, &labels).unwrap();

        let names = vec!["sci.space".to_string(), "soc.religion".to_string()];
        let report = model.evaluate(&docs, &labels, &names).unwrap();
        assert_eq!(report.classes.len(), 2);
        assert_eq!(report.accuracy, 1.0);
    }

    #[test]
    fn test_stats_only_features() {
        let features = Pipeline::new(vec![
            ("subjectbody".to_string(), DocumentSplitter::new().into()),
            (
                "stats".to_string(),
                Pipeline::new(vec![
                    ("selector".to_string(), FieldSelector::new("body").into()),
                    ("stats".to_string(), TextStats::new().into()),
                    ("vect".to_string(), DictVectorizer::new().into()),
                ])
                .unwrap()
                .into(),
            ),
        ])
        .unwrap();
        let mut model =
            ClassificationPipeline::new(features, LinearSvc::new(SvcConfig::default()));
        let (docs, labels) = corpus();
        model.fit(&docs, &labels).unwrap();
        assert_eq!(model.features_of(&docs).unwrap().n_cols(), 2);
    }

    #[test]
    fn test_length_mismatch_and_unfitted() {
        let mut model = small_pipeline();
        let (docs, _) = corpus();
        assert!(matches!(
            model.fit(&docs, &[0, 1]).unwrap_err(),
            MosaicError::Shape(_)
        ));
        assert!(matches!(
            model.predict(&docs).unwrap_err(),
            MosaicError::NotFitted(_)
        ));
    }
}
