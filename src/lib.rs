//! docsift: sift marked-up paragraphs out of Word documents
//!
//! This library parses `.docx` packages, replays multi-level outline
//! numbering so every paragraph knows its rendered number, and extracts the
//! paragraphs carrying review markup (tracked changes, comments, notes,
//! highlights, bracketed placeholders) into a tabular review report.

pub mod config;
pub mod error;
pub mod extract;
pub mod package;
pub mod report;

// Re-export commonly used types
pub use config::Config;
pub use error::{DocumentError, DocumentErrorKind};
pub use extract::models::{Criteria, DocumentExtract, ExtractedParagraph};
pub use extract::orchestrator::{BatchExtract, DocumentInput, extract_batch, extract_document};
pub use package::DocumentPackage;
pub use report::assemble::assemble_report;
pub use report::table::{ReportTable, build_sections, has_any_annotations};
