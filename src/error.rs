//! Failure taxonomy for document extraction
//!
//! Most defects in real-world packages are recoverable: optional parts may
//! be absent, attributes unparseable, style graphs cyclic, annotation ids
//! dangling. Those conditions are absorbed where they occur. A document
//! fails only when its package cannot yield a readable main body, and the
//! failure is attributed to that input alone so the rest of a batch keeps
//! going.

use thiserror::Error;

/// Extraction failure for a single input document.
#[derive(Debug, Error)]
#[error("{file}: {kind}")]
pub struct DocumentError {
    /// Display name of the offending input.
    pub file: String,
    #[source]
    pub kind: DocumentErrorKind,
}

impl DocumentError {
    pub fn new(file: impl Into<String>, kind: DocumentErrorKind) -> Self {
        DocumentError {
            file: file.into(),
            kind,
        }
    }
}

/// The conditions that make a document unextractable.
#[derive(Debug, Error)]
pub enum DocumentErrorKind {
    #[error("cannot open package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("missing required part {0}")]
    MissingBody(&'static str),

    #[error("main document part is not well-formed XML")]
    MalformedBody,

    #[error("package is a spreadsheet workbook, not a word-processing document")]
    Spreadsheet,

    #[error("extraction task aborted")]
    Aborted,
}
