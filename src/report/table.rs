//! Review-table layout
//!
//! The abstract shape of the report: one titled section per input document,
//! one row per extracted paragraph, five columns. Column proportions are
//! decided once for the whole batch so every section lines up; the wide
//! comment column is only worth its space when something in the batch
//! actually resolved an annotation.

use crate::extract::models::{AnnotationBodies, DocumentExtract, ExtractedParagraph, RenderedParagraph};

/// Column headers of every section table.
pub const COLUMN_HEADERS: [&str; 5] = ["Ref", "Source", "Style", "Paragraph", "Comment"];

/// Total table width in twentieths of a point: a letter page inside one
/// inch margins.
pub const TABLE_WIDTH_DXA: usize = 9360;

/// One row of a report section.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub location: String,
    pub source: String,
    pub style: String,
    pub paragraph: RenderedParagraph,
    pub annotations: AnnotationBodies,
}

/// One report section per input document.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

/// The assembled, still-abstract report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub sections: Vec<ReportSection>,
    /// Batch-wide layout switch; see [`has_any_annotations`].
    pub with_annotations: bool,
}

impl ReportTable {
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

/// True when at least one extracted paragraph in the batch resolved at
/// least one annotation body.
pub fn has_any_annotations(extracts: &[DocumentExtract]) -> bool {
    extracts
        .iter()
        .flat_map(|extract| extract.paragraphs.iter())
        .any(|paragraph| paragraph.annotations.iter().any(Option::is_some))
}

/// Group per-document extracts into report sections, in input order.
pub fn build_sections(extracts: &[DocumentExtract]) -> ReportTable {
    let with_annotations = has_any_annotations(extracts);
    let sections = extracts
        .iter()
        .map(|extract| ReportSection {
            title: extract.name.clone(),
            rows: extract.paragraphs.iter().map(build_row).collect(),
        })
        .collect();
    ReportTable {
        sections,
        with_annotations,
    }
}

fn build_row(paragraph: &ExtractedParagraph) -> ReportRow {
    ReportRow {
        location: paragraph.location.to_string(),
        source: paragraph.source.label().to_string(),
        style: paragraph.style_id.clone().unwrap_or_default(),
        paragraph: paragraph.paragraph.clone(),
        annotations: paragraph.annotations.clone(),
    }
}

/// Column widths in dxa. With annotations the comment column takes 30% of
/// the table; without it collapses to a stub and the paragraph column gets
/// the space.
pub fn column_widths(with_annotations: bool) -> [usize; 5] {
    if with_annotations {
        [1123, 936, 1123, 3370, 2808]
    } else {
        [1310, 936, 1310, 4868, 936]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::models::{
        LocationLabel, RenderedSegment, RunFormat, SourceRegion,
    };

    fn extract_with(annotations: AnnotationBodies) -> DocumentExtract {
        DocumentExtract {
            name: "input.docx".into(),
            paragraphs: vec![ExtractedParagraph {
                paragraph: RenderedParagraph {
                    segments: vec![RenderedSegment::text("body", RunFormat::default(), None)],
                },
                annotations,
                location: LocationLabel::Page {
                    section: 1,
                    page: 2,
                },
                style_id: None,
                source: SourceRegion::Document,
            }],
        }
    }

    #[test]
    fn test_widths_always_fill_the_table() {
        for with in [true, false] {
            let total: usize = column_widths(with).iter().sum();
            assert_eq!(total, TABLE_WIDTH_DXA);
        }
    }

    #[test]
    fn test_placeholders_do_not_count_as_annotations() {
        let none = extract_with(vec![None, None]);
        assert!(!has_any_annotations(std::slice::from_ref(&none)));

        let some = extract_with(vec![None, Some(RenderedParagraph::default())]);
        assert!(has_any_annotations(&[none, some]));
    }

    #[test]
    fn test_sections_keep_input_order_and_render_locations() {
        let mut first = extract_with(vec![]);
        first.name = "a.docx".into();
        let mut second = extract_with(vec![]);
        second.name = "b.docx".into();

        let table = build_sections(&[first, second]);
        assert!(!table.with_annotations);
        assert_eq!(table.sections.len(), 2);
        assert_eq!(table.sections[0].title, "a.docx");
        assert_eq!(table.sections[1].title, "b.docx");
        assert_eq!(table.sections[0].rows[0].location, "Sect 1, p 2");
        assert_eq!(table.sections[0].rows[0].source, "Document");
        assert_eq!(table.row_count(), 2);
    }
}
