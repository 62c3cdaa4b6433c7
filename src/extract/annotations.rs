//! Annotation body resolution
//!
//! Comment, footnote, and endnote references in a paragraph are resolved
//! against their package parts into rendered bodies. Each resolved body is
//! preceded by an italicized identification line; dangling ids keep their
//! position as `None` placeholders so the caller's ordering stays aligned
//! with the references in the paragraph.

use roxmltree::{Document as XmlDocument, Node};
use tracing::debug;

use super::models::{RenderedParagraph, RenderedSegment, RunFormat};
use super::runs::build_paragraph;
use super::xml::{attr, is_tag};

/// Which annotation family a resolution call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Comment,
    Footnote,
    Endnote,
}

impl AnnotationKind {
    fn element_name(self) -> &'static str {
        match self {
            AnnotationKind::Comment => "comment",
            AnnotationKind::Footnote => "footnote",
            AnnotationKind::Endnote => "endnote",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnnotationKind::Comment => "Comment",
            AnnotationKind::Footnote => "Footnote",
            AnnotationKind::Endnote => "Endnote",
        }
    }
}

/// Resolve `ids` in order against the annotation part. An absent part
/// resolves nothing at all, which keeps documents without the part cheap.
pub fn resolve_annotations(
    ids: &[String],
    part: Option<&XmlDocument>,
    kind: AnnotationKind,
) -> Vec<Option<RenderedParagraph>> {
    let mut resolved = Vec::new();
    if ids.is_empty() {
        return resolved;
    }
    let Some(doc) = part else {
        return resolved;
    };

    for id in ids {
        match find_by_id(doc, kind.element_name(), id) {
            Some(node) => {
                resolved.push(Some(identification_paragraph(&node, kind, id)));
                for paragraph in node.children().filter(|n| is_tag(n, "p")) {
                    resolved.push(Some(build_paragraph(&paragraph)));
                }
            }
            None => {
                debug!(kind = kind.label(), id = %id, "dangling annotation reference");
                resolved.push(None);
            }
        }
    }
    resolved
}

fn find_by_id<'a>(doc: &'a XmlDocument, element: &str, id: &str) -> Option<Node<'a, 'a>> {
    doc.descendants()
        .find(|n| is_tag(n, element) && attr(n, "id") == Some(id))
}

/// `Comment 3 (JD, 2 Mar 2023)` or `Footnote 4`, italicized. Comments name
/// their author by initials when present, full name otherwise.
fn identification_paragraph(node: &Node, kind: AnnotationKind, id: &str) -> RenderedParagraph {
    let mut heading = format!("{} {}", kind.label(), id);
    if kind == AnnotationKind::Comment {
        let who = attr(node, "initials")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| attr(node, "author").filter(|s| !s.trim().is_empty()));
        let date = attr(node, "date").map(format_annotation_date);
        match (who, date) {
            (Some(who), Some(date)) => heading.push_str(&format!(" ({who}, {date})")),
            (Some(who), None) => heading.push_str(&format!(" ({who})")),
            (None, Some(date)) => heading.push_str(&format!(" ({date})")),
            (None, None) => {}
        }
    }
    let format = RunFormat {
        italic: true,
        ..RunFormat::default()
    };
    RenderedParagraph {
        segments: vec![RenderedSegment::text(heading, format, None)],
    }
}

/// RFC 3339 timestamps render as `2 Mar 2023`; anything unparseable passes
/// through as written.
fn format_annotation_date(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%-d %b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
