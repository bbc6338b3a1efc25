//! Labelled text corpora read from local files.
//!
//! Two layouts are supported:
//!
//! - a directory with one sub-directory per category and one file per document
//!   (the layout of the 20 Newsgroups archives once extracted);
//! - a JSON lines file with one `{"text": "...", "label": "..."}` object per line.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};

/// Documents with parallel class labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// Raw document texts.
    pub documents: Vec<String>,
    /// Index into `target_names` for every document.
    pub labels: Vec<usize>,
    /// Category names, sorted.
    pub target_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    text: String,
    label: String,
}

/// Decode bytes as UTF-8, falling back to Latin-1 for legacy archives.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Corpus {
    /// Load from a directory of category directories.
    ///
    /// With `categories`, only those categories are read and each must exist.
    pub fn from_dir<P: AsRef<Path>>(root: P, categories: Option<&[String]>) -> Result<Self> {
        let root = root.as_ref();
        let available: Vec<PathBuf> = sorted_entries(root)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect();

        let selected: Vec<PathBuf> = match categories {
            Some(wanted) => {
                let wanted: BTreeSet<&str> = wanted.iter().map(String::as_str).collect();
                for name in &wanted {
                    if !available.iter().any(|p| file_name(p) == *name) {
                        return Err(MosaicError::invalid_argument(format!(
                            "category '{name}' not found under {}",
                            root.display()
                        )));
                    }
                }
                available
                    .into_iter()
                    .filter(|p| wanted.contains(file_name(p).as_str()))
                    .collect()
            }
            None => available,
        };

        let mut corpus = Corpus {
            documents: Vec::new(),
            labels: Vec::new(),
            target_names: selected.iter().map(|p| file_name(p)).collect(),
        };

        for (label, dir) in selected.iter().enumerate() {
            let mut count = 0;
            for path in sorted_entries(dir)? {
                if !path.is_file() {
                    continue;
                }
                corpus.documents.push(decode_text(fs::read(&path)?));
                corpus.labels.push(label);
                count += 1;
            }
            debug!("read {count} documents from {}", dir.display());
        }

        info!(
            "loaded {} documents in {} categories from {}",
            corpus.len(),
            corpus.target_names.len(),
            root.display()
        );
        Ok(corpus)
    }

    /// Load from a JSON lines file of `{"text", "label"}` objects.
    ///
    /// With `categories`, lines with other labels are skipped and every listed
    /// category becomes a target name even if no line carries it.
    pub fn from_jsonl<P: AsRef<Path>>(path: P, categories: Option<&[String]>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut records = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: JsonRecord = serde_json::from_str(&line).map_err(|e| {
                MosaicError::invalid_input(format!(
                    "{}:{}: invalid corpus record: {e}",
                    path.display(),
                    line_num + 1
                ))
            })?;
            records.push(record);
        }

        let target_names: Vec<String> = match categories {
            Some(wanted) => wanted
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            None => records
                .iter()
                .map(|r| r.label.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        let mut corpus = Corpus {
            documents: Vec::new(),
            labels: Vec::new(),
            target_names,
        };
        let mut skipped = 0;
        for record in records {
            match corpus.target_names.binary_search(&record.label) {
                Ok(label) => {
                    corpus.documents.push(record.text);
                    corpus.labels.push(label);
                }
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("skipped {skipped} records outside the requested categories");
        }

        info!(
            "loaded {} documents in {} categories from {}",
            corpus.len(),
            corpus.target_names.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Load a directory with [`from_dir`](Self::from_dir), anything else with
    /// [`from_jsonl`](Self::from_jsonl).
    pub fn from_path<P: AsRef<Path>>(path: P, categories: Option<&[String]>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path, categories)
        } else {
            Self::from_jsonl(path, categories)
        }
    }

    /// Reorder documents randomly, keeping labels aligned.
    pub fn shuffle(&mut self, seed: u64) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        self.documents = order
            .iter()
            .map(|&i| std::mem::take(&mut self.documents[i]))
            .collect();
        self.labels = order.iter().map(|&i| self.labels[i]).collect();
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents per category, in `target_names` order.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.target_names.len()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}
