//! Archive part access for `.docx` packages
//!
//! A `.docx` file is a zip archive of XML parts. [`DocumentPackage`] inflates
//! the word-processing parts once and hands out parsed trees on demand; the
//! trees borrow the cached text, so a package must outlive every tree taken
//! from it. Optional parts that are missing or damaged degrade to absence
//! rather than failing the document.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use roxmltree::Document as XmlDocument;
use tracing::warn;

use crate::error::DocumentErrorKind;

pub const BODY_PART: &str = "word/document.xml";
pub const BODY_RELS_PART: &str = "word/_rels/document.xml.rels";
pub const STYLES_PART: &str = "word/styles.xml";
pub const NUMBERING_PART: &str = "word/numbering.xml";
pub const COMMENTS_PART: &str = "word/comments.xml";
pub const FOOTNOTES_PART: &str = "word/footnotes.xml";
pub const ENDNOTES_PART: &str = "word/endnotes.xml";

/// Part name that identifies a spreadsheet workbook mislabeled as `.docx`.
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Inflated `word/**` parts of one package.
pub struct DocumentPackage {
    parts: HashMap<String, String>,
    looks_like_spreadsheet: bool,
}

impl DocumentPackage {
    /// Open a package from its raw bytes and cache every word-processing
    /// part. Individual entries that fail to inflate are skipped with a
    /// warning; only an unreadable archive fails.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentErrorKind> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = HashMap::new();
        let mut looks_like_spreadsheet = false;

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(index, %err, "skipping unreadable archive entry");
                    continue;
                }
            };
            let name = entry.name().to_string();
            if name == WORKBOOK_PART {
                looks_like_spreadsheet = true;
            }
            if !is_word_part(&name) {
                continue;
            }
            let mut text = String::new();
            if let Err(err) = entry.read_to_string(&mut text) {
                warn!(part = %name, %err, "skipping part that failed to inflate");
                continue;
            }
            parts.insert(name, text);
        }

        Ok(DocumentPackage {
            parts,
            looks_like_spreadsheet,
        })
    }

    /// Raw text of a part, BOM stripped, or `None` when absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.get(name).map(|text| strip_bom(text))
    }

    /// Parsed tree of a part. Absent and malformed both yield `None`; the
    /// malformed case logs so a damaged optional part is visible without
    /// failing the document.
    pub fn xml(&self, name: &str) -> Option<XmlDocument<'_>> {
        let text = self.text(name)?;
        match XmlDocument::parse(text) {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(part = name, %err, "part is not well-formed XML");
                None
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// True when the archive carries a spreadsheet workbook part, which
    /// means the input is an `.xlsx` renamed or mislabeled as `.docx`.
    pub fn looks_like_spreadsheet(&self) -> bool {
        self.looks_like_spreadsheet
    }

    /// Relationship id to target map from a `.rels` part. Absent or
    /// malformed parts yield an empty map.
    pub fn relationships(&self, name: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        let Some(doc) = self.xml(name) else {
            return map;
        };
        for node in doc.descendants().filter(|n| n.is_element()) {
            if node.tag_name().name() != "Relationship" {
                continue;
            }
            let id = node.attribute("Id");
            let target = node.attribute("Target");
            if let (Some(id), Some(target)) = (id, target) {
                map.insert(id.to_string(), target.to_string());
            }
        }
        map
    }
}

fn is_word_part(name: &str) -> bool {
    name.starts_with("word/") && (name.ends_with(".xml") || name.ends_with(".rels"))
}

/// Resolve a relationship target to a zip part path. Absolute targets are
/// rooted at the archive; relative ones are resolved against `word/`.
pub fn rel_target_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None => format!("word/{target}"),
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
