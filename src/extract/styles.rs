//! Style definitions and inherited numbering
//!
//! Paragraphs often carry no `numPr` of their own and inherit numbering
//! through their style's `basedOn` chain. The chain walk stops at the first
//! style that declares numbering; a revisited id means the sheet declares a
//! cycle and resolution reports no numbering instead of spinning.

use std::collections::{HashMap, HashSet};

use roxmltree::Document as XmlDocument;
use tracing::debug;

use super::xml::{attr, child, child_val, is_tag};

/// Numbering reference attached to a style definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleNumbering {
    pub list_id: i64,
    pub level: usize,
}

/// One entry from `word/styles.xml`.
#[derive(Debug, Clone)]
pub struct StyleRecord {
    pub id: String,
    pub name: Option<String>,
    pub based_on: Option<String>,
    pub numbering: Option<StyleNumbering>,
}

/// Style-id lookup over a document's style sheet.
#[derive(Debug, Default)]
pub struct StyleSheet {
    styles: HashMap<String, StyleRecord>,
}

impl StyleSheet {
    /// Parse the styles part; an absent part yields an empty sheet. Styles
    /// without an id are skipped, as are numbering references that fail to
    /// parse.
    pub fn from_part(part: Option<&XmlDocument>) -> Self {
        let mut styles = HashMap::new();
        if let Some(doc) = part {
            for node in doc.descendants().filter(|n| is_tag(n, "style")) {
                let Some(id) = attr(&node, "styleId") else {
                    continue;
                };
                let name = child(&node, "name")
                    .and_then(|n| attr(&n, "val"))
                    .map(str::to_string);
                let based_on = child_val(&node, "basedOn").map(str::to_string);
                let numbering = child(&node, "pPr")
                    .and_then(|ppr| child(&ppr, "numPr"))
                    .and_then(|num_pr| {
                        let list_id = child_val(&num_pr, "numId")?.parse().ok()?;
                        let level = match child_val(&num_pr, "ilvl") {
                            Some(raw) => raw.parse().ok()?,
                            None => 0,
                        };
                        Some(StyleNumbering { list_id, level })
                    });
                styles.insert(
                    id.to_string(),
                    StyleRecord {
                        id: id.to_string(),
                        name,
                        based_on,
                        numbering,
                    },
                );
            }
        }
        StyleSheet { styles }
    }

    pub fn get(&self, id: &str) -> Option<&StyleRecord> {
        self.styles.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// First numbering reference found walking the `basedOn` chain from
    /// `id`, including `id` itself.
    pub fn resolve_numbering(&self, id: &str) -> Option<StyleNumbering> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = id;
        loop {
            if !visited.insert(current) {
                debug!(style = id, at = current, "style basedOn chain declares a cycle");
                return None;
            }
            let record = self.styles.get(current)?;
            if let Some(numbering) = record.numbering {
                return Some(numbering);
            }
            current = record.based_on.as_deref()?;
        }
    }
}
