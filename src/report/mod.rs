//! Report generation module
//!
//! Builds the abstract review table out of per-document extracts and
//! serializes it to a `.docx` package.

pub mod assemble;
pub mod table;

pub use assemble::assemble_report;
pub use table::{ReportTable, build_sections, column_widths, has_any_annotations};
