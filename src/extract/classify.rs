//! Paragraph classification against extraction criteria
//!
//! Every predicate is structural: it answers from the paragraph's subtree
//! alone, without resolving annotation parts or style sheets. Resolution of
//! what a marker points at happens later and only for paragraphs that pass.

use roxmltree::Node;

use super::models::Criteria;
use super::xml::{attr, is_tag};

/// True when any enabled criterion matches the paragraph.
pub fn is_interesting(paragraph: &Node, criteria: &Criteria) -> bool {
    (criteria.redline && has_tracked_changes(paragraph))
        || (criteria.comments && has_comment_range(paragraph))
        || (criteria.footnotes && has_reference(paragraph, "footnoteReference"))
        || (criteria.endnotes && has_reference(paragraph, "endnoteReference"))
        || (criteria.highlight && has_highlight(paragraph))
        || (criteria.square_brackets && has_square_brackets(paragraph))
}

/// Secondary gate: a paragraph whose runs carry no text at all (after
/// trimming) is structurally interesting at most, and stays out of the
/// report. Deleted text counts as text; a fully deleted paragraph is
/// exactly what a redline review wants to see.
pub fn has_text_content(paragraph: &Node) -> bool {
    paragraph
        .descendants()
        .filter(|n| n.is_element() && matches!(n.tag_name().name(), "t" | "delText"))
        .filter_map(|n| n.text())
        .any(|text| !text.trim().is_empty())
}

fn has_tracked_changes(paragraph: &Node) -> bool {
    paragraph.descendants().any(|n| {
        n.is_element()
            && matches!(
                n.tag_name().name(),
                "ins" | "del" | "moveFrom" | "moveTo"
            )
    })
}

fn has_comment_range(paragraph: &Node) -> bool {
    paragraph
        .descendants()
        .any(|n| is_tag(&n, "commentRangeStart"))
}

fn has_reference(paragraph: &Node, reference: &str) -> bool {
    paragraph.descendants().any(|n| is_tag(&n, reference))
}

fn has_highlight(paragraph: &Node) -> bool {
    paragraph.descendants().any(|n| {
        is_tag(&n, "highlight") && attr(&n, "val").is_none_or(|v| v != "none")
    })
}

fn has_square_brackets(paragraph: &Node) -> bool {
    visible_text(paragraph).contains(['[', ']'])
}

/// Visible text of a paragraph: run text plus inline glyph elements, with
/// deleted text excluded. Tabs and breaks appear as `\t` and `\n` so token
/// detection sees the separators Word stores as elements.
pub fn visible_text(paragraph: &Node) -> String {
    let mut text = String::new();
    for node in paragraph.descendants() {
        if !node.is_element() {
            continue;
        }
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            "noBreakHyphen" => text.push('\u{2011}'),
            "softHyphen" => text.push('\u{ad}'),
            _ => {}
        }
    }
    text
}
