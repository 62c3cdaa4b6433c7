//! Local-name helpers over `roxmltree` nodes
//!
//! WordprocessingML parts bind several namespace prefixes (`w:`, `r:`,
//! `m:`, and vendor extensions). Matching on local names keeps the walkers
//! tolerant of producers that choose different prefixes for the same
//! namespaces.

use roxmltree::Node;

/// True when `node` is an element whose local name is `local`.
pub(crate) fn is_tag(node: &Node, local: &str) -> bool {
    node.is_element() && node.tag_name().name() == local
}

/// Attribute lookup by local name, ignoring any namespace prefix.
pub(crate) fn attr<'a>(node: &Node<'a, 'a>, local: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| {
            let name = a.name();
            match name.rsplit_once(':') {
                Some((_, l)) => l == local,
                None => name == local,
            }
        })
        .map(|a| a.value())
}

/// First child element with the given local name.
pub(crate) fn child<'a>(node: &Node<'a, 'a>, local: &str) -> Option<Node<'a, 'a>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == local)
}

/// All child elements with the given local name, in document order.
pub(crate) fn children<'a, 'b>(
    node: &Node<'a, 'a>,
    local: &'b str,
) -> impl Iterator<Item = Node<'a, 'a>> + use<'a, 'b> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == local)
}

/// `w:val` of the first child element with the given local name.
pub(crate) fn child_val<'a>(node: &Node<'a, 'a>, local: &str) -> Option<&'a str> {
    child(node, local).and_then(|n| attr(&n, "val"))
}

/// Toggle semantics for on/off run properties: presence means on unless the
/// value says otherwise.
pub(crate) fn on_off(node: &Node) -> Option<bool> {
    match attr(node, "val") {
        None => Some(true),
        Some(v) => match v {
            "0" | "false" | "off" | "none" => Some(false),
            _ => Some(true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WML: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn wrap(inner: &str) -> String {
        format!(r#"<w:root xmlns:w="{WML}">{inner}</w:root>"#)
    }

    #[test]
    fn test_attr_ignores_prefix() {
        let xml = wrap(r#"<w:pStyle w:val="Heading1"/>"#);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let node = child(&doc.root_element(), "pStyle").unwrap();
        assert_eq!(attr(&node, "val"), Some("Heading1"));
        assert_eq!(attr(&node, "missing"), None);
    }

    #[test]
    fn test_child_val_reads_nested_val() {
        let xml = wrap(r#"<w:numPr><w:ilvl w:val="2"/><w:numId w:val="5"/></w:numPr>"#);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let num_pr = child(&doc.root_element(), "numPr").unwrap();
        assert_eq!(child_val(&num_pr, "ilvl"), Some("2"));
        assert_eq!(child_val(&num_pr, "numId"), Some("5"));
        assert_eq!(child_val(&num_pr, "absent"), None);
    }

    #[test]
    fn test_on_off_toggle_values() {
        let xml = wrap(r#"<w:b/><w:i w:val="false"/><w:caps w:val="1"/>"#);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();
        assert_eq!(on_off(&child(&root, "b").unwrap()), Some(true));
        assert_eq!(on_off(&child(&root, "i").unwrap()), Some(false));
        assert_eq!(on_off(&child(&root, "caps").unwrap()), Some(true));
    }

    #[test]
    fn test_children_keeps_document_order() {
        let xml = wrap(r#"<w:lvl w:ilvl="0"/><w:other/><w:lvl w:ilvl="1"/>"#);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();
        let levels: Vec<_> = children(&root, "lvl")
            .filter_map(|n| attr(&n, "ilvl"))
            .collect();
        assert_eq!(levels, vec!["0", "1"]);
    }
}
