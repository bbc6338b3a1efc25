//! TF-IDF vectorizer for text feature extraction.

use std::collections::HashSet;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::analysis::tokenizer::regex::DEFAULT_TOKEN_PATTERN;
use crate::error::{MosaicError, Result};
use crate::matrix::{CsrMatrix, FeatureMatrix};
use crate::pipeline::batch::Batch;
use crate::pipeline::transformer::Transformer;

/// Row normalization applied after IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Unit Euclidean length.
    #[default]
    L2,
    /// Unit sum of absolute values.
    L1,
    /// Leave rows as weighted.
    None,
}

/// Configuration for a [`TfidfVectorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfidfConfig {
    /// Drop terms appearing in fewer documents than this.
    pub min_df: usize,
    /// Drop terms appearing in more than this fraction of documents.
    pub max_df: f64,
    /// Lowercase tokens before counting.
    pub lowercase: bool,
    /// Remove English stop words.
    pub stop_words: bool,
    /// Regular expression whose matches are the tokens.
    pub token_pattern: String,
    /// Use `1 + ln(tf)` instead of raw counts.
    pub sublinear_tf: bool,
    /// Add one to document frequencies, as if an extra document held every term.
    pub smooth_idf: bool,
    /// Row normalization.
    pub norm: Norm,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            min_df: 1,
            max_df: 1.0,
            lowercase: true,
            stop_words: false,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            sublinear_tf: false,
            smooth_idf: true,
            norm: Norm::L2,
        }
    }
}

impl TfidfConfig {
    /// Set the minimum document count.
    pub fn min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Set the maximum document fraction.
    pub fn max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    /// Check the document frequency bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(MosaicError::config(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.min_df == 0 {
            return Err(MosaicError::config("min_df must be at least 1"));
        }
        Ok(())
    }

    fn analyzer(&self) -> Result<PipelineAnalyzer> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&self.token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer).with_name("tfidf");
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if self.stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
        }
        Ok(analyzer)
    }
}

#[derive(Debug, Clone)]
struct Vocabulary {
    terms: Vec<String>,
    index: AHashMap<String, usize>,
    idf: Vec<f64>,
}

/// Learns a vocabulary with IDF weights and maps texts to sparse rows.
///
/// # Examples
///
/// ```
/// use mosaic::features::{TfidfConfig, TfidfVectorizer};
///
/// let docs = vec!["the cat sat".to_string(), "the dog sat".to_string()];
/// let mut vect = TfidfVectorizer::new(TfidfConfig::default()).unwrap();
/// vect.fit_texts(&docs).unwrap();
///
/// assert_eq!(vect.vocabulary().unwrap(), ["cat", "dog", "sat", "the"]);
/// let m = vect.transform_texts(&docs).unwrap();
/// assert_eq!((m.n_rows(), m.n_cols()), (2, 4));
/// ```
pub struct TfidfVectorizer {
    config: TfidfConfig,
    analyzer: Arc<dyn Analyzer>,
    vocabulary: Option<Vocabulary>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer. Fails on an invalid token pattern or bounds.
    pub fn new(config: TfidfConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = Arc::new(config.analyzer()?);
        Ok(Self {
            config,
            analyzer,
            vocabulary: None,
        })
    }

    /// Create an unfitted vectorizer with a caller-supplied analyzer.
    ///
    /// The `lowercase`, `stop_words` and `token_pattern` settings are ignored.
    pub fn with_analyzer(config: TfidfConfig, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            analyzer,
            vocabulary: None,
        })
    }

    /// The configuration this vectorizer was built with.
    pub fn config(&self) -> &TfidfConfig {
        &self.config
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        self.analyzer.analyze(text)
    }

    fn tokenize_all(&self, texts: &[String]) -> Result<Vec<Vec<String>>> {
        texts.par_iter().map(|text| self.tokenize(text)).collect()
    }

    /// Learn the vocabulary and IDF weights.
    pub fn fit_texts(&mut self, texts: &[String]) -> Result<()> {
        let tokenized = self.tokenize_all(texts)?;
        let n_documents = texts.len();

        let mut document_frequency: AHashMap<&str, usize> = AHashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let max_count = self.config.max_df * n_documents as f64;
        let mut terms: Vec<String> = document_frequency
            .iter()
            .filter(|&(_, &df)| df >= self.config.min_df && df as f64 <= max_count)
            .map(|(term, _)| term.to_string())
            .collect();
        terms.sort_unstable();

        if terms.is_empty() {
            return Err(MosaicError::analysis(format!(
                "empty vocabulary after pruning {} candidate terms from {} documents",
                document_frequency.len(),
                n_documents
            )));
        }

        let n = n_documents as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency[term.as_str()] as f64;
                if self.config.smooth_idf {
                    ((1.0 + n) / (1.0 + df)).ln() + 1.0
                } else {
                    (n / df).ln() + 1.0
                }
            })
            .collect();

        info!(
            "tfidf vocabulary: {} of {} terms kept from {} documents",
            terms.len(),
            document_frequency.len(),
            n_documents
        );

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        self.vocabulary = Some(Vocabulary { terms, index, idf });
        Ok(())
    }

    /// Encode texts as an N × |vocabulary| CSR matrix.
    pub fn transform_texts(&self, texts: &[String]) -> Result<CsrMatrix> {
        let vocabulary = self
            .vocabulary
            .as_ref()
            .ok_or_else(|| MosaicError::not_fitted("tfidf_vectorizer"))?;

        let rows: Vec<Vec<(usize, f64)>> = texts
            .par_iter()
            .map(|text| {
                let tokens = self.tokenize(text)?;
                Ok(self.weigh(vocabulary, &tokens))
            })
            .collect::<Result<_>>()?;

        debug!("tfidf encoded {} texts", texts.len());
        CsrMatrix::from_rows(vocabulary.terms.len(), rows)
    }

    fn weigh(&self, vocabulary: &Vocabulary, tokens: &[String]) -> Vec<(usize, f64)> {
        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        for token in tokens {
            if let Some(&idx) = vocabulary.index.get(token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut row: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.config.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * vocabulary.idf[idx])
            })
            .collect();

        let norm = match self.config.norm {
            Norm::L2 => row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => row.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 && norm != 1.0 {
            for (_, v) in &mut row {
                *v /= norm;
            }
        }
        row
    }

    /// Learned terms in column order.
    pub fn vocabulary(&self) -> Option<&[String]> {
        self.vocabulary.as_ref().map(|v| v.terms.as_slice())
    }

    /// Learned IDF weight per column.
    pub fn idf(&self) -> Option<&[f64]> {
        self.vocabulary.as_ref().map(|v| v.idf.as_slice())
    }

    /// Get the size of the vocabulary (0 before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, |v| v.terms.len())
    }
}

impl Transformer for TfidfVectorizer {
    fn fit(&mut self, input: &Batch, _labels: Option<&[usize]>) -> Result<()> {
        let texts = input.as_texts(self.name())?;
        self.fit_texts(texts)
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let texts = input.as_texts(self.name())?;
        Ok(Batch::Matrix(FeatureMatrix::Sparse(
            self.transform_texts(texts)?,
        )))
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.vocabulary().map(<[String]>::to_vec)
    }

    fn name(&self) -> &'static str {
        "tfidf_vectorizer"
    }
}

impl std::fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("config", &self.config)
            .field("vocabulary_size", &self.vocabulary_size())
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}
