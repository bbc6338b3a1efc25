//! Raw documents and the structure-of-arrays batches derived from them.
//!
//! A raw document is a header block and a body separated by the first blank
//! line. The [`DocumentSplitter`] turns a batch of them into a [`FieldBatch`]
//! with one `subject` and one `body` entry per document.

pub mod field_batch;
pub mod newsgroup;
pub mod splitter;

pub use field_batch::FieldBatch;
pub use newsgroup::{strip_newsgroup_footer, strip_newsgroup_quoting};
pub use splitter::{BODY_FIELD, DocumentSplitter, SUBJECT_FIELD};
