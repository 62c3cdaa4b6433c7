//! Core data structures for extracted content

use serde::{Deserialize, Serialize};

/// Ordered annotation bodies attached to one extracted paragraph. A `None`
/// entry is a placeholder for a reference whose id resolved to nothing, so
/// positions still line up with the order of references in the paragraph.
pub type AnnotationBodies = Vec<Option<RenderedParagraph>>;

/// Region of the source document a paragraph came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRegion {
    Document,
    Header,
    Footer,
}

impl SourceRegion {
    pub fn label(&self) -> &'static str {
        match self {
            SourceRegion::Document => "Document",
            SourceRegion::Header => "Header",
            SourceRegion::Footer => "Footer",
        }
    }
}

/// Tracked-change wrapper a run was nested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Insertion,
    Deletion,
    MoveFrom,
    MoveTo,
}

impl ChangeKind {
    /// Character style carrying this change's appearance in the report.
    pub fn style_id(&self) -> &'static str {
        match self {
            ChangeKind::Insertion => "Insertion",
            ChangeKind::Deletion => "Deletion",
            ChangeKind::MoveFrom => "MoveFrom",
            ChangeKind::MoveTo => "MoveTo",
        }
    }
}

/// What a rendered segment carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Text,
    /// Hard line break inside a paragraph, kept structural so consumers do
    /// not have to sniff `\n` out of segment text.
    LineBreak,
    CommentAnchor { id: String },
    FootnoteAnchor { id: String },
    EndnoteAnchor { id: String },
}

impl SegmentKind {
    /// Character style for annotation anchor labels, `None` for plain text.
    pub fn anchor_style_id(&self) -> Option<&'static str> {
        match self {
            SegmentKind::CommentAnchor { .. } => Some("CommentAnchor"),
            SegmentKind::FootnoteAnchor { .. } => Some("FootnoteAnchor"),
            SegmentKind::EndnoteAnchor { .. } => Some("EndnoteAnchor"),
            SegmentKind::Text | SegmentKind::LineBreak => None,
        }
    }
}

/// Run-level formatting captured once per source run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    pub caps: bool,
    pub small_caps: bool,
    pub strike: bool,
    pub double_strike: bool,
    /// Highlight color name (`yellow`, `cyan`, ...) when the run is marked.
    pub highlight: Option<String>,
    /// Underline kind (`single`, `double`, ...); `none` is normalized away.
    pub underline: Option<String>,
    pub vert_align: Option<VertAlign>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertAlign {
    Superscript,
    Subscript,
}

/// One formatted slice of a paragraph's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSegment {
    pub text: String,
    pub format: RunFormat,
    /// Tracked-change provenance, `None` for unchanged content.
    pub change: Option<ChangeKind>,
    pub kind: SegmentKind,
}

impl RenderedSegment {
    pub fn text(text: impl Into<String>, format: RunFormat, change: Option<ChangeKind>) -> Self {
        RenderedSegment {
            text: text.into(),
            format,
            change,
            kind: SegmentKind::Text,
        }
    }

    pub fn line_break(format: RunFormat, change: Option<ChangeKind>) -> Self {
        RenderedSegment {
            text: String::new(),
            format,
            change,
            kind: SegmentKind::LineBreak,
        }
    }
}

/// A paragraph rendered to formatted segments, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedParagraph {
    pub segments: Vec<RenderedSegment>,
}

impl RenderedParagraph {
    /// Concatenated text of every segment; break segments read as newlines.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for segment in &self.segments {
            match segment.kind {
                SegmentKind::LineBreak => text.push('\n'),
                _ => text.push_str(&segment.text),
            }
        }
        text
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Where an extracted paragraph sat in its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationLabel {
    /// Outline number, either replayed from numbering definitions or typed
    /// by hand at the start of the paragraph.
    Numbered(String),
    /// Fallback for unnumbered body paragraphs.
    Page { section: u32, page: u32 },
    /// Fallback for unnumbered header and footer paragraphs, which have no
    /// meaningful page of their own.
    Region { section: u32, region: SourceRegion },
}

impl std::fmt::Display for LocationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationLabel::Numbered(label) => f.write_str(label),
            LocationLabel::Page { section, page } => write!(f, "Sect {section}, p {page}"),
            LocationLabel::Region { section, region } => {
                write!(f, "Sect {section}, {}", region.label())
            }
        }
    }
}

/// One paragraph that matched the extraction criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedParagraph {
    pub paragraph: RenderedParagraph,
    pub annotations: AnnotationBodies,
    pub location: LocationLabel,
    /// Style id from the paragraph properties, unresolved.
    pub style_id: Option<String>,
    pub source: SourceRegion,
}

/// Everything extracted from one input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtract {
    /// Display name the caller supplied for this input.
    pub name: String,
    pub paragraphs: Vec<ExtractedParagraph>,
}

/// Selection of extraction criteria. A paragraph is kept when any enabled
/// criterion matches; an empty selection keeps nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub redline: bool,
    pub highlight: bool,
    pub square_brackets: bool,
    pub comments: bool,
    pub footnotes: bool,
    pub endnotes: bool,
}

impl Criteria {
    pub fn all() -> Self {
        Criteria {
            redline: true,
            highlight: true,
            square_brackets: true,
            comments: true,
            footnotes: true,
            endnotes: true,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.redline
            || self.highlight
            || self.square_brackets
            || self.comments
            || self.footnotes
            || self.endnotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_label_display() {
        assert_eq!(LocationLabel::Numbered("2.1.3".into()).to_string(), "2.1.3");
        assert_eq!(
            LocationLabel::Page {
                section: 1,
                page: 4
            }
            .to_string(),
            "Sect 1, p 4"
        );
        assert_eq!(
            LocationLabel::Region {
                section: 2,
                region: SourceRegion::Header
            }
            .to_string(),
            "Sect 2, Header"
        );
    }

    #[test]
    fn test_plain_text_renders_breaks_as_newlines() {
        let paragraph = RenderedParagraph {
            segments: vec![
                RenderedSegment::text("first", RunFormat::default(), None),
                RenderedSegment::line_break(RunFormat::default(), None),
                RenderedSegment::text("second", RunFormat::default(), None),
            ],
        };
        assert_eq!(paragraph.plain_text(), "first\nsecond");
    }

    #[test]
    fn test_criteria_defaults_to_nothing() {
        assert!(!Criteria::default().any_enabled());
        assert!(Criteria::all().any_enabled());
    }

    #[test]
    fn test_extract_serializes_to_json() {
        let extract = DocumentExtract {
            name: "contract.docx".into(),
            paragraphs: vec![ExtractedParagraph {
                paragraph: RenderedParagraph {
                    segments: vec![RenderedSegment::text(
                        "[open item]",
                        RunFormat::default(),
                        Some(ChangeKind::Insertion),
                    )],
                },
                annotations: vec![None],
                location: LocationLabel::Numbered("3.2".into()),
                style_id: Some("BodyText".into()),
                source: SourceRegion::Document,
            }],
        };
        let json = serde_json::to_string(&extract).unwrap();
        let back: DocumentExtract = serde_json::from_str(&json).unwrap();
        assert_eq!(back, extract);
    }
}
