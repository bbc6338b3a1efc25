//! # Mosaic
//!
//! Heterogeneous feature extraction for text classification, built from
//! transformers that chain into pipelines and combine into feature unions.
//!
//! ## Features
//!
//! - Newsgroup post splitting into subject and body fields
//! - TF-IDF vectorization with configurable analysis
//! - Truncated SVD over sparse matrices
//! - Text statistics and dictionary vectorization
//! - Weighted feature unions fitted in parallel
//! - A linear SVM with per-class evaluation reports

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod document;
pub mod error;
pub mod features;
pub mod matrix;
pub mod ml;
pub mod pipeline;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
