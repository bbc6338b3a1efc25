//! Splits raw newsgroup posts into subject and body fields.

use log::debug;

use crate::document::field_batch::FieldBatch;
use crate::document::newsgroup::{strip_newsgroup_footer, strip_newsgroup_quoting};
use crate::error::Result;
use crate::pipeline::batch::Batch;
use crate::pipeline::transformer::Transformer;

/// Name of the subject column produced by the splitter.
pub const SUBJECT_FIELD: &str = "subject";

/// Name of the body column produced by the splitter.
pub const BODY_FIELD: &str = "body";

const SUBJECT_PREFIX: &str = "Subject:";

/// Turns a batch of raw posts into a [`FieldBatch`] with `subject` and `body`.
///
/// The header ends at the first blank line. The subject is the remainder of
/// the first header line starting with `Subject:`, with its leading space kept.
/// The body loses its signature footer and quoted lines. Malformed posts
/// yield empty strings rather than errors.
///
/// # Examples
///
/// ```
/// use mosaic::document::DocumentSplitter;
///
/// let (subject, body) = DocumentSplitter::split("Subject: Hello World\n\nLine one.\nLine two.");
/// assert_eq!(subject, " Hello World");
/// assert_eq!(body, "Line one.\nLine two.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentSplitter;

impl DocumentSplitter {
    /// Create a new splitter.
    pub fn new() -> Self {
        DocumentSplitter
    }

    /// Split one raw post into `(subject, body)`.
    pub fn split(text: &str) -> (String, String) {
        let (headers, body) = text.split_once("\n\n").unwrap_or((text, ""));

        let body = strip_newsgroup_quoting(&strip_newsgroup_footer(body));

        let subject = headers
            .split('\n')
            .find_map(|line| line.strip_prefix(SUBJECT_PREFIX))
            .unwrap_or_default()
            .to_string();

        (subject, body)
    }

    /// Split every post, keeping input order.
    pub fn split_all(&self, documents: &[String]) -> Result<FieldBatch> {
        let (subjects, bodies): (Vec<String>, Vec<String>) =
            documents.iter().map(|doc| Self::split(doc)).unzip();

        debug!("split {} documents into subject/body", documents.len());

        FieldBatch::with_len(documents.len())
            .with_field(SUBJECT_FIELD, subjects)?
            .with_field(BODY_FIELD, bodies)
    }
}

impl Transformer for DocumentSplitter {
    fn fit(&mut self, _input: &Batch, _labels: Option<&[usize]>) -> Result<()> {
        Ok(())
    }

    fn transform(&self, input: &Batch) -> Result<Batch> {
        let documents = input.as_texts(self.name())?;
        Ok(Batch::Fields(self.split_all(documents)?))
    }

    fn name(&self) -> &'static str {
        "document_splitter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_subject_and_body() {
        let doc = "From: someone@example.com\nSubject: Hello World\nLines: 2\n\nLine one.\nLine two.";
        let (subject, body) = DocumentSplitter::split(doc);

        assert_eq!(subject, " Hello World");
        assert_eq!(body, "Line one.\nLine two.");
    }

    #[test]
    fn test_first_subject_line_wins() {
        let doc = "Subject: first\nSubject: second\n\nbody";
        assert_eq!(DocumentSplitter::split(doc).0, " first");
    }

    #[test]
    fn test_subject_prefix_must_start_line() {
        let doc = "X-Original-Subject: nope\n\nbody";
        assert_eq!(DocumentSplitter::split(doc).0, "");
    }

    #[test]
    fn test_missing_separator_degrades_to_empty_body() {
        let (subject, body) = DocumentSplitter::split("Subject: only headers");
        assert_eq!(subject, " only headers");
        assert_eq!(body, "");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(DocumentSplitter::split(""), (String::new(), String::new()));
    }

    #[test]
    fn test_body_is_cleaned() {
        let doc = "Subject: Re: gods\n\nIn article <x>, joe writes:\n> quoted\nMy reply.\n\n--\nsig line";
        let (_, body) = DocumentSplitter::split(doc);
        assert_eq!(body, "My reply.\n");
    }

    #[test]
    fn test_transform_keeps_order_and_length() {
        let docs: Vec<String> = (0..5)
            .map(|i| format!("Subject: post {i}\n\nbody {i}"))
            .collect();
        let splitter = DocumentSplitter::new();

        let out = splitter.transform(&Batch::Texts(docs)).unwrap();
        let fields = out.as_fields("test").unwrap();

        assert_eq!(fields.len(), 5);
        assert_eq!(fields.get(SUBJECT_FIELD).unwrap().len(), 5);
        assert_eq!(fields.get(BODY_FIELD).unwrap().len(), 5);
        assert_eq!(fields.get(SUBJECT_FIELD).unwrap()[3], " post 3");
        assert_eq!(fields.get(BODY_FIELD).unwrap()[4], "body 4");
    }

    #[test]
    fn test_rejects_wrong_input_kind() {
        let splitter = DocumentSplitter::new();
        let err = splitter.transform(&Batch::Fields(FieldBatch::new())).unwrap_err();
        assert!(matches!(err, crate::error::MosaicError::InvalidInput(_)));
    }
}
