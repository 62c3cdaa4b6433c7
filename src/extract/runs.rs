//! Run rendering
//!
//! Turns a paragraph's run content into ordered [`RenderedSegment`]s. Runs
//! nested in tracked-change wrappers keep their own formatting and gain the
//! wrapper's change tag; annotation references split the run so the text on
//! either side of an anchor stays intact.

use roxmltree::Node;

use super::models::{
    ChangeKind, RenderedParagraph, RenderedSegment, RunFormat, SegmentKind, VertAlign,
};
use super::xml::{attr, child, on_off};

/// Render a paragraph's content in document order.
pub fn build_paragraph(paragraph: &Node) -> RenderedParagraph {
    let mut segments = Vec::new();
    collect_children(paragraph, None, &mut segments);
    RenderedParagraph { segments }
}

/// Walk direct children, recursing into change wrappers and hyperlinks.
/// Recursion keeps nesting uniform: an insertion wrapping a hyperlink
/// wrapping runs renders the same as bare inserted runs.
fn collect_children(parent: &Node, change: Option<ChangeKind>, segments: &mut Vec<RenderedSegment>) {
    for node in parent.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "r" => render_run(&node, change, segments),
            "ins" => collect_children(&node, Some(ChangeKind::Insertion), segments),
            "del" => collect_children(&node, Some(ChangeKind::Deletion), segments),
            "moveFrom" => collect_children(&node, Some(ChangeKind::MoveFrom), segments),
            "moveTo" => collect_children(&node, Some(ChangeKind::MoveTo), segments),
            "hyperlink" | "smartTag" => collect_children(&node, change, segments),
            _ => {}
        }
    }
}

/// Render one run. Text accumulates until a break or an annotation
/// reference forces a flush; each flushed slice carries the run's base
/// formatting and change tag.
fn render_run(run: &Node, change: Option<ChangeKind>, segments: &mut Vec<RenderedSegment>) {
    let format = read_run_format(run);
    let mut pending = String::new();

    for node in run.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "t" | "delText" => pending.push_str(node.text().unwrap_or_default()),
            "tab" => pending.push('\t'),
            "noBreakHyphen" => pending.push('\u{2011}'),
            "softHyphen" => pending.push('\u{ad}'),
            "br" | "cr" => {
                flush(&mut pending, &format, change, segments);
                segments.push(RenderedSegment::line_break(format.clone(), change));
            }
            "commentReference" => push_anchor(&node, "Cmt", &format, change, &mut pending, segments),
            "footnoteReference" => push_anchor(&node, "Fn", &format, change, &mut pending, segments),
            "endnoteReference" => push_anchor(&node, "En", &format, change, &mut pending, segments),
            _ => {}
        }
    }
    flush(&mut pending, &format, change, segments);
}

fn push_anchor(
    node: &Node,
    short: &str,
    format: &RunFormat,
    change: Option<ChangeKind>,
    pending: &mut String,
    segments: &mut Vec<RenderedSegment>,
) {
    // references without an id point at nothing and render as nothing
    let Some(id) = attr(node, "id") else {
        return;
    };
    flush(pending, format, change, segments);
    let kind = match node.tag_name().name() {
        "commentReference" => SegmentKind::CommentAnchor { id: id.to_string() },
        "footnoteReference" => SegmentKind::FootnoteAnchor { id: id.to_string() },
        _ => SegmentKind::EndnoteAnchor { id: id.to_string() },
    };
    segments.push(RenderedSegment {
        text: format!("[{short} {id}]"),
        format: format.clone(),
        change,
        kind,
    });
}

fn flush(
    pending: &mut String,
    format: &RunFormat,
    change: Option<ChangeKind>,
    segments: &mut Vec<RenderedSegment>,
) {
    if pending.is_empty() {
        return;
    }
    segments.push(RenderedSegment::text(
        std::mem::take(pending),
        format.clone(),
        change,
    ));
}

/// Formatting from the run's `rPr`, read once per run.
fn read_run_format(run: &Node) -> RunFormat {
    let mut format = RunFormat::default();
    let Some(rpr) = child(run, "rPr") else {
        return format;
    };
    format.bold = toggle(&rpr, "b");
    format.italic = toggle(&rpr, "i");
    format.caps = toggle(&rpr, "caps");
    format.small_caps = toggle(&rpr, "smallCaps");
    format.strike = toggle(&rpr, "strike");
    format.double_strike = toggle(&rpr, "dstrike");
    format.highlight = child(&rpr, "highlight")
        .and_then(|n| attr(&n, "val"))
        .filter(|v| *v != "none")
        .map(str::to_string);
    format.underline = child(&rpr, "u")
        .map(|n| attr(&n, "val").unwrap_or("single"))
        .filter(|v| *v != "none")
        .map(str::to_string);
    format.vert_align = child(&rpr, "vertAlign")
        .and_then(|n| attr(&n, "val"))
        .and_then(|v| match v {
            "superscript" => Some(VertAlign::Superscript),
            "subscript" => Some(VertAlign::Subscript),
            _ => None,
        });
    format
}

fn toggle(rpr: &Node, name: &str) -> bool {
    child(rpr, name).and_then(|n| on_off(&n)).unwrap_or(false)
}
