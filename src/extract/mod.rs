//! Document extraction module
//!
//! This module walks a parsed `.docx` package in document order, replaying
//! numbering and position state, and pulls out the paragraphs that match
//! the active criteria together with their resolved annotations.

pub(crate) mod annotations;
pub(crate) mod classify;
pub mod models;
pub mod numbering;
pub mod orchestrator;
pub(crate) mod runs;
pub mod styles;
pub(crate) mod xml;

// Re-export the model types and the extraction entry points
pub use models::*;
pub use orchestrator::{BatchExtract, DocumentInput, extract_batch, extract_document};
