//! Extraction drive
//!
//! One ordered pass over the body replays numbering counters, section and
//! page position for every paragraph, then classifies it and resolves its
//! annotations. A second pass visits the headers and footers referenced by
//! each section. Documents in a batch are independent: each runs on its own
//! blocking task with its own state, and a failed document surfaces as a
//! per-file error instead of sinking the batch.

use std::collections::HashMap;

use roxmltree::{Document as XmlDocument, Node};
use tracing::{debug, info};

use crate::error::{DocumentError, DocumentErrorKind};
use crate::package::{self, DocumentPackage};

use super::annotations::{AnnotationKind, resolve_annotations};
use super::classify::{has_text_content, is_interesting, visible_text};
use super::models::{
    Criteria, DocumentExtract, ExtractedParagraph, LocationLabel, SourceRegion,
};
use super::numbering::{
    CounterState, NumberingCatalog, detect_manual_number, track_direct_numbering,
    track_style_numbering,
};
use super::runs::build_paragraph;
use super::styles::StyleSheet;
use super::xml::{attr, child, child_val, is_tag};

/// One input handed over by the caller: a display name and the package
/// bytes. Reading files is the caller's business.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Batch outcome. Extracts keep input order; failures carry the name of
/// the file they belong to.
#[derive(Debug, Default)]
pub struct BatchExtract {
    pub documents: Vec<DocumentExtract>,
    pub failures: Vec<DocumentError>,
}

/// Counter scopes for one region pass. Direct and style-inherited numbering
/// advance independently so one source cannot contaminate the other.
#[derive(Debug, Default)]
struct NumberingScope {
    direct: CounterState,
    styled: CounterState,
}

/// Section and page position over the body sequence. The carried label
/// lets an unnumbered paragraph inherit the number of the numbered one
/// right before it, until a section break clears it.
#[derive(Debug)]
struct SectionState {
    section: u32,
    page: u32,
    last_label: Option<String>,
}

impl SectionState {
    fn new() -> Self {
        SectionState {
            section: 1,
            page: 1,
            last_label: None,
        }
    }
}

struct ExtractContext<'a, 'input> {
    criteria: &'a Criteria,
    numbering: &'a NumberingCatalog,
    styles: &'a StyleSheet,
    comments: Option<&'a XmlDocument<'input>>,
    footnotes: Option<&'a XmlDocument<'input>>,
    endnotes: Option<&'a XmlDocument<'input>>,
}

impl ExtractContext<'_, '_> {
    /// Label resolution order: direct numbering, then style-inherited
    /// numbering, then a manual token typed into the text. The first two
    /// advance counters; every paragraph goes through this regardless of
    /// whether it gets extracted.
    fn resolve_label(&self, paragraph: &Node, scope: &mut NumberingScope) -> Option<String> {
        track_direct_numbering(paragraph, self.numbering, &mut scope.direct)
            .or_else(|| {
                track_style_numbering(paragraph, self.styles, self.numbering, &mut scope.styled)
            })
            .or_else(|| detect_manual_number(&visible_text(paragraph)))
    }

    fn extract_record(
        &self,
        paragraph: &Node,
        location: LocationLabel,
        source: SourceRegion,
    ) -> ExtractedParagraph {
        let mut annotations = resolve_annotations(
            &marker_ids(paragraph, "commentRangeStart"),
            self.comments,
            AnnotationKind::Comment,
        );
        annotations.extend(resolve_annotations(
            &marker_ids(paragraph, "footnoteReference"),
            self.footnotes,
            AnnotationKind::Footnote,
        ));
        annotations.extend(resolve_annotations(
            &marker_ids(paragraph, "endnoteReference"),
            self.endnotes,
            AnnotationKind::Endnote,
        ));

        ExtractedParagraph {
            paragraph: build_paragraph(paragraph),
            annotations,
            location,
            style_id: paragraph_style_id(paragraph),
            source,
        }
    }
}

/// Extract one document. The only fatal condition is a package that cannot
/// yield a readable main body; damaged optional parts degrade to absence.
pub fn extract_document(
    input: &DocumentInput,
    criteria: &Criteria,
) -> Result<DocumentExtract, DocumentError> {
    let fail = |kind| DocumentError::new(&input.name, kind);

    let pkg = DocumentPackage::from_bytes(&input.bytes).map_err(&fail)?;
    let Some(body_text) = pkg.text(package::BODY_PART) else {
        let kind = if pkg.looks_like_spreadsheet() {
            DocumentErrorKind::Spreadsheet
        } else {
            DocumentErrorKind::MissingBody(package::BODY_PART)
        };
        return Err(fail(kind));
    };
    let body = XmlDocument::parse(body_text).map_err(|_| fail(DocumentErrorKind::MalformedBody))?;
    let Some(body_node) = child(&body.root_element(), "body") else {
        return Err(fail(DocumentErrorKind::MalformedBody));
    };

    let numbering_part = pkg.xml(package::NUMBERING_PART);
    let numbering = NumberingCatalog::from_part(numbering_part.as_ref());
    let styles_part = pkg.xml(package::STYLES_PART);
    let styles = StyleSheet::from_part(styles_part.as_ref());
    let comments = pkg.xml(package::COMMENTS_PART);
    let footnotes = pkg.xml(package::FOOTNOTES_PART);
    let endnotes = pkg.xml(package::ENDNOTES_PART);

    let ctx = ExtractContext {
        criteria,
        numbering: &numbering,
        styles: &styles,
        comments: comments.as_ref(),
        footnotes: footnotes.as_ref(),
        endnotes: endnotes.as_ref(),
    };

    let mut paragraphs = Vec::new();
    let mut state = SectionState::new();
    let mut scope = NumberingScope::default();

    for node in body_node.children().filter(|n| is_tag(n, "p")) {
        process_body_paragraph(&ctx, &node, &mut state, &mut scope, &mut paragraphs);
    }

    process_regions(&ctx, &pkg, &body_node, &mut paragraphs);

    debug!(
        file = %input.name,
        extracted = paragraphs.len(),
        sections = state.section,
        "document pass complete"
    );

    Ok(DocumentExtract {
        name: input.name.clone(),
        paragraphs,
    })
}

fn process_body_paragraph(
    ctx: &ExtractContext,
    node: &Node,
    state: &mut SectionState,
    scope: &mut NumberingScope,
    out: &mut Vec<ExtractedParagraph>,
) {
    // a page break inside the paragraph puts the paragraph on the new page
    state.page += page_breaks_in(node);

    let label = ctx.resolve_label(node, scope);
    let effective = label.clone().or_else(|| state.last_label.clone());
    if label.is_some() {
        state.last_label = label;
    }

    if is_interesting(node, ctx.criteria) && has_text_content(node) {
        let location = match effective {
            Some(label) => LocationLabel::Numbered(label),
            None => LocationLabel::Page {
                section: state.section,
                page: state.page,
            },
        };
        out.push(ctx.extract_record(node, location, SourceRegion::Document));
    }

    // the paragraph holding a sectPr ends its section; position and the
    // carried label reset for the next one, counters do not
    if section_break(node).is_some() {
        state.section += 1;
        state.page = 1;
        state.last_label = None;
    }
}

/// Walk each section's header and footer parts. Every part gets a fresh
/// counter scope and carry-forward slot of its own.
fn process_regions(
    ctx: &ExtractContext,
    pkg: &DocumentPackage,
    body_node: &Node,
    out: &mut Vec<ExtractedParagraph>,
) {
    let rels = pkg.relationships(package::BODY_RELS_PART);
    if rels.is_empty() {
        return;
    }

    let mut section = 0u32;
    for node in body_node.children().filter(|n| n.is_element()) {
        let sect_pr = if is_tag(&node, "p") {
            section_break(&node)
        } else if is_tag(&node, "sectPr") {
            Some(node)
        } else {
            None
        };
        let Some(sect_pr) = sect_pr else {
            continue;
        };
        section += 1;

        for (region, part_name) in region_refs(&sect_pr, &rels) {
            let Some(part) = pkg.xml(&part_name) else {
                debug!(part = %part_name, "referenced header or footer part is unavailable");
                continue;
            };
            process_region_part(ctx, &part, section, region, out);
        }
    }
}

/// Header and footer references of one `sectPr`, resolved through the body
/// relationships to part names.
fn region_refs(sect_pr: &Node, rels: &HashMap<String, String>) -> Vec<(SourceRegion, String)> {
    sect_pr
        .children()
        .filter(|n| n.is_element())
        .filter_map(|n| {
            let region = match n.tag_name().name() {
                "headerReference" => SourceRegion::Header,
                "footerReference" => SourceRegion::Footer,
                _ => return None,
            };
            let id = attr(&n, "id")?;
            let target = rels.get(id)?;
            Some((region, package::rel_target_path(target)))
        })
        .collect()
}

fn process_region_part(
    ctx: &ExtractContext,
    part: &XmlDocument,
    section: u32,
    region: SourceRegion,
    out: &mut Vec<ExtractedParagraph>,
) {
    let mut scope = NumberingScope::default();
    let mut last_label: Option<String> = None;

    for node in part.root_element().children().filter(|n| is_tag(n, "p")) {
        let label = ctx.resolve_label(&node, &mut scope);
        let effective = label.clone().or_else(|| last_label.clone());
        if label.is_some() {
            last_label = label;
        }

        if is_interesting(&node, ctx.criteria) && has_text_content(&node) {
            let location = match effective {
                Some(label) => LocationLabel::Numbered(label),
                None => LocationLabel::Region { section, region },
            };
            out.push(ctx.extract_record(&node, location, region));
        }
    }
}

/// Rendered page breaks and explicit page-break runs both advance the page
/// position.
fn page_breaks_in(paragraph: &Node) -> u32 {
    paragraph
        .descendants()
        .filter(|n| n.is_element())
        .filter(|n| match n.tag_name().name() {
            "lastRenderedPageBreak" => true,
            "br" => attr(n, "type").is_some_and(|t| t.eq_ignore_ascii_case("page")),
            _ => false,
        })
        .count() as u32
}

fn section_break<'a>(paragraph: &Node<'a, 'a>) -> Option<Node<'a, 'a>> {
    let ppr = child(paragraph, "pPr")?;
    child(&ppr, "sectPr")
}

fn paragraph_style_id(paragraph: &Node) -> Option<String> {
    let ppr = child(paragraph, "pPr")?;
    child_val(&ppr, "pStyle").map(str::to_string)
}

/// Ids of annotation markers inside the paragraph, in document order.
fn marker_ids(paragraph: &Node, marker: &str) -> Vec<String> {
    paragraph
        .descendants()
        .filter(|n| is_tag(n, marker))
        .filter_map(|n| attr(&n, "id"))
        .map(str::to_string)
        .collect()
}

/// Extract a whole batch. Each document runs on its own blocking task;
/// results are awaited in input order, and a failure never takes the rest
/// of the batch down with it.
pub async fn extract_batch(inputs: Vec<DocumentInput>, criteria: Criteria) -> BatchExtract {
    let mut handles = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name.clone();
        let handle =
            tokio::task::spawn_blocking(move || extract_document(&input, &criteria));
        handles.push((name, handle));
    }

    let mut batch = BatchExtract::default();
    for (name, handle) in handles {
        match handle.await {
            Ok(Ok(extract)) => {
                info!(file = %extract.name, paragraphs = extract.paragraphs.len(), "extracted");
                batch.documents.push(extract);
            }
            Ok(Err(err)) => batch.failures.push(err),
            Err(_) => batch
                .failures
                .push(DocumentError::new(name, DocumentErrorKind::Aborted)),
        }
    }
    batch
}
