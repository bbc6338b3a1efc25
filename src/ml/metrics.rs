//! Per-class classification metrics.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};

/// Precision, recall, F1 and support for one class or one average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// Class name, or the average's name.
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Number of true instances.
    pub support: usize,
}

/// The result of [`classification_report`].
///
/// `Display` renders a fixed-width table with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One entry per class, in ascending label order.
    pub classes: Vec<ClassMetrics>,
    /// Fraction of correct predictions.
    pub accuracy: f64,
    /// Unweighted mean over classes.
    pub macro_avg: ClassMetrics,
    /// Support-weighted mean over classes.
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Total number of samples.
    pub fn support(&self) -> usize {
        self.weighted_avg.support
    }

    /// Look up the metrics for a named class.
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Build a report comparing `y_true` with `y_pred`.
///
/// Classes are the sorted union of labels in both slices. Label `i` is shown
/// as `target_names[i]`, or as the number itself when `target_names` is
/// empty. Undefined precision or recall (no predicted or no true instances)
/// counts as 0.0.
///
/// # Examples
///
/// ```
/// use mosaic::ml::classification_report;
///
/// let names = vec!["ham".to_string(), "spam".to_string()];
/// let report = classification_report(&[0, 0, 1, 1], &[0, 1, 1, 1], &names).unwrap();
///
/// assert_eq!(report.accuracy, 0.75);
/// assert_eq!(report.class("spam").unwrap().recall, 1.0);
/// ```
pub fn classification_report(
    y_true: &[usize],
    y_pred: &[usize],
    target_names: &[String],
) -> Result<ClassificationReport> {
    if y_true.len() != y_pred.len() {
        return Err(MosaicError::shape(format!(
            "{} true labels vs {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(MosaicError::invalid_argument(
            "cannot report on an empty set of labels",
        ));
    }

    let labels: BTreeSet<usize> = y_true.iter().chain(y_pred).copied().collect();

    let mut classes = Vec::with_capacity(labels.len());
    for &label in &labels {
        let name = if target_names.is_empty() {
            label.to_string()
        } else {
            target_names.get(label).cloned().ok_or_else(|| {
                MosaicError::invalid_argument(format!(
                    "label {label} has no entry among {} target names",
                    target_names.len()
                ))
            })?
        };

        let mut true_positive = 0;
        let mut predicted = 0;
        let mut support = 0;
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if p == label {
                predicted += 1;
                if t == label {
                    true_positive += 1;
                }
            }
            if t == label {
                support += 1;
            }
        }

        let precision = ratio(true_positive, predicted);
        let recall = ratio(true_positive, support);
        classes.push(ClassMetrics {
            label: name,
            precision,
            recall,
            f1_score: f1(precision, recall),
            support,
        });
    }

    let total = y_true.len();
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    let n = classes.len() as f64;

    let macro_avg = ClassMetrics {
        label: "macro avg".to_string(),
        precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
        recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
        f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / n,
        support: total,
    };

    let weighted = |field: fn(&ClassMetrics) -> f64| {
        classes
            .iter()
            .map(|c| field(c) * c.support as f64)
            .sum::<f64>()
            / total as f64
    };
    let weighted_avg = ClassMetrics {
        label: "weighted avg".to_string(),
        precision: weighted(|c| c.precision),
        recall: weighted(|c| c.recall),
        f1_score: weighted(|c| c.f1_score),
        support: total,
    };

    Ok(ClassificationReport {
        classes,
        accuracy: ratio(correct, total),
        macro_avg,
        weighted_avg,
    })
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.chars().count())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        let row = |f: &mut fmt::Formatter<'_>, m: &ClassMetrics| {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1_score, m.support
            )
        };

        for class in &self.classes {
            row(f, class)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support()
        )?;
        row(f, &self.macro_avg)?;
        row(f, &self.weighted_avg)
    }
}
