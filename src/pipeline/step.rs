//! The closed set of components a pipeline can be built from.

use crate::document::DocumentSplitter;
use crate::error::Result;
use crate::features::{DictVectorizer, TextStats, TfidfVectorizer, TruncatedSvd};
use crate::pipeline::batch::Batch;
use crate::pipeline::pipeline::Pipeline;
use crate::pipeline::selector::FieldSelector;
use crate::pipeline::transformer::Transformer;
use crate::pipeline::union::FeatureUnion;

/// One step of a [`Pipeline`] or one branch of a [`FeatureUnion`].
#[derive(Debug)]
pub enum Step {
    /// Raw posts → subject/body fields.
    Splitter(DocumentSplitter),
    /// Fields → one column of texts.
    Selector(FieldSelector),
    /// Texts → length/sentence records.
    Stats(TextStats),
    /// Texts → sparse TF-IDF matrix.
    Tfidf(TfidfVectorizer),
    /// Matrix → dense reduced matrix.
    Svd(TruncatedSvd),
    /// Records → dense matrix.
    Dict(DictVectorizer),
    /// Any input → weighted, concatenated matrices.
    Union(FeatureUnion),
    /// A nested chain of steps.
    Pipeline(Pipeline),
}

impl Step {
    fn inner(&self) -> &dyn Transformer {
        match self {
            Step::Splitter(t) => t,
            Step::Selector(t) => t,
            Step::Stats(t) => t,
            Step::Tfidf(t) => t,
            Step::Svd(t) => t,
            Step::Dict(t) => t,
            Step::Union(t) => t,
            Step::Pipeline(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Transformer {
        match self {
            Step::Splitter(t) => t,
            Step::Selector(t) => t,
            Step::Stats(t) => t,
            Step::Tfidf(t) => t,
            Step::Svd(t) => t,
            Step::Dict(t) => t,
            Step::Union(t) => t,
            Step::Pipeline(t) => t,
        }
    }
}

impl Transformer for Step {
    fn fit(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<()> {
        self.inner_mut().fit(input, labels)
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        self.inner().transform(input)
    }

    fn fit_transform(&mut self, input: &Batch, labels: Option<&[usize]>) -> Result<Batch> {
        self.inner_mut().fit_transform(input, labels)
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.inner().feature_names()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

macro_rules! impl_from_step {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Step {
                fn from(t: $ty) -> Self {
                    Step::$variant(t)
                }
            }
        )*
    };
}

impl_from_step! {
    Splitter => DocumentSplitter,
    Selector => FieldSelector,
    Stats => TextStats,
    Tfidf => TfidfVectorizer,
    Svd => TruncatedSvd,
    Dict => DictVectorizer,
    Union => FeatureUnion,
    Pipeline => Pipeline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_name() {
        let step = Step::from(FieldSelector::new("body"));
        assert_eq!(step.name(), "field_selector");

        let step = Step::from(TextStats::new());
        assert_eq!(step.name(), "text_stats");
        assert!(step.feature_names().is_none());
    }
}
