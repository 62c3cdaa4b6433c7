//! Numbering definitions and label replay
//!
//! WordprocessingML stores list appearance once per abstract definition and
//! points concrete list ids at it, so the rendered label of a paragraph
//! depends on every numbered paragraph before it. [`NumberingCatalog`] holds
//! the parsed definitions and [`CounterState`] replays the counters in
//! document order. Labels typed by hand into paragraph text are recognized
//! separately by [`detect_manual_number`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::{Document as XmlDocument, Node};

use super::styles::StyleSheet;
use super::xml::{attr, child, child_val, children};

/// Numbering depth; WordprocessingML defines levels 0 through 8.
pub const MAX_LEVELS: usize = 9;

/// Numbering format kinds understood by the label formatter. Unrecognized
/// format names map to decimal rather than failing the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberFormat {
    #[default]
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
    Bullet,
    Ordinal,
    CardinalText,
    OrdinalText,
    NumberInDash,
}

impl NumberFormat {
    pub fn from_attr(value: &str) -> Self {
        match value {
            "decimal" => NumberFormat::Decimal,
            "lowerLetter" => NumberFormat::LowerLetter,
            "upperLetter" => NumberFormat::UpperLetter,
            "lowerRoman" => NumberFormat::LowerRoman,
            "upperRoman" => NumberFormat::UpperRoman,
            "bullet" => NumberFormat::Bullet,
            "ordinal" => NumberFormat::Ordinal,
            "cardinalText" => NumberFormat::CardinalText,
            "ordinalText" => NumberFormat::OrdinalText,
            "numberInDash" => NumberFormat::NumberInDash,
            _ => NumberFormat::Decimal,
        }
    }
}

/// Per-level appearance inside an abstract definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSpec {
    pub format: NumberFormat,
    /// `lvlText` pattern with `%1` through `%9` placeholders. Absent means
    /// the label joins the formatted level values with `.`.
    pub template: Option<String>,
}

/// Parsed `word/numbering.xml`: concrete list ids and the per-level specs of
/// their abstract definitions.
#[derive(Debug, Default)]
pub struct NumberingCatalog {
    list_to_abstract: HashMap<i64, i64>,
    abstract_levels: HashMap<i64, HashMap<usize, LevelSpec>>,
}

impl NumberingCatalog {
    /// Build the lookup maps from the numbering part. An absent part yields
    /// an empty catalog, which disables definition-driven numbering for the
    /// document. Entries with unparseable ids are skipped.
    pub fn from_part(part: Option<&XmlDocument>) -> Self {
        let mut catalog = NumberingCatalog::default();
        let Some(doc) = part else {
            return catalog;
        };

        for node in doc.descendants().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "abstractNum" => {
                    let Some(abstract_id) = parse_id(attr(&node, "abstractNumId")) else {
                        continue;
                    };
                    let mut levels = HashMap::new();
                    for lvl in children(&node, "lvl") {
                        let Some(level) = attr(&lvl, "ilvl").and_then(|v| v.parse().ok()) else {
                            continue;
                        };
                        let format = child_val(&lvl, "numFmt")
                            .map(NumberFormat::from_attr)
                            .unwrap_or_default();
                        let template = child_val(&lvl, "lvlText")
                            .filter(|t| !t.is_empty())
                            .map(str::to_string);
                        levels.insert(level, LevelSpec { format, template });
                    }
                    catalog.abstract_levels.insert(abstract_id, levels);
                }
                "num" => {
                    let Some(list_id) = parse_id(attr(&node, "numId")) else {
                        continue;
                    };
                    let Some(abstract_id) = parse_id(child_val(&node, "abstractNumId")) else {
                        continue;
                    };
                    catalog.list_to_abstract.insert(list_id, abstract_id);
                }
                _ => {}
            }
        }
        catalog
    }

    /// A list id counts as known once a `num` entry points it somewhere,
    /// even if the abstract definition itself is missing or sparse.
    pub fn has_list(&self, list_id: i64) -> bool {
        self.list_to_abstract.contains_key(&list_id)
    }

    pub fn is_empty(&self) -> bool {
        self.list_to_abstract.is_empty() && self.abstract_levels.is_empty()
    }

    fn spec_at(&self, list_id: i64, level: usize) -> Option<&LevelSpec> {
        let abstract_id = self.list_to_abstract.get(&list_id)?;
        self.abstract_levels.get(abstract_id)?.get(&level)
    }
}

fn parse_id(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.parse().ok())
}

/// Mutable per-level counters replayed over a paragraph sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterState {
    levels: [u32; MAX_LEVELS],
}

impl CounterState {
    pub fn new() -> Self {
        CounterState::default()
    }

    /// Increment `level` and reset every deeper level; shallower levels are
    /// untouched. Levels past the supported depth clamp to the deepest slot.
    pub fn advance(&mut self, level: usize) -> u32 {
        let level = level.min(MAX_LEVELS - 1);
        self.levels[level] += 1;
        for slot in self.levels[level + 1..].iter_mut() {
            *slot = 0;
        }
        self.levels[level]
    }

    pub fn value(&self, level: usize) -> u32 {
        self.levels[level.min(MAX_LEVELS - 1)]
    }
}

impl From<[u32; MAX_LEVELS]> for CounterState {
    fn from(levels: [u32; MAX_LEVELS]) -> Self {
        CounterState { levels }
    }
}

/// Direct `numPr` reference of a paragraph. A missing `ilvl` means level 0;
/// an unparseable id or level disables numbering for the paragraph.
fn paragraph_numbering(paragraph: &Node) -> Option<(i64, usize)> {
    let ppr = child(paragraph, "pPr")?;
    let num_pr = child(&ppr, "numPr")?;
    let list_id = child_val(&num_pr, "numId")?.parse().ok()?;
    let level = match child_val(&num_pr, "ilvl") {
        Some(raw) => raw.parse().ok()?,
        None => 0,
    };
    Some((list_id, level))
}

/// Advance the direct-numbering counters for a paragraph and compose its
/// label. Paragraphs without resolvable direct numbering consume nothing.
pub fn track_direct_numbering(
    paragraph: &Node,
    catalog: &NumberingCatalog,
    counters: &mut CounterState,
) -> Option<String> {
    let (list_id, level) = paragraph_numbering(paragraph)?;
    advance_and_compose(list_id, level, catalog, counters)
}

/// Same replay for numbering inherited through the paragraph style chain,
/// on its own counter scope so the two sources cannot contaminate each
/// other.
pub fn track_style_numbering(
    paragraph: &Node,
    styles: &StyleSheet,
    catalog: &NumberingCatalog,
    counters: &mut CounterState,
) -> Option<String> {
    let ppr = child(paragraph, "pPr")?;
    let style_id = child_val(&ppr, "pStyle")?;
    let numbering = styles.resolve_numbering(style_id)?;
    advance_and_compose(numbering.list_id, numbering.level, catalog, counters)
}

fn advance_and_compose(
    list_id: i64,
    level: usize,
    catalog: &NumberingCatalog,
    counters: &mut CounterState,
) -> Option<String> {
    if !catalog.has_list(list_id) {
        return None;
    }
    let level = level.min(MAX_LEVELS - 1);
    counters.advance(level);
    Some(compose_label(list_id, level, catalog, counters))
}

/// Apply the target level's template over the formatted counter values for
/// levels `0..=level`, or join them with `.` when no template exists.
fn compose_label(
    list_id: i64,
    level: usize,
    catalog: &NumberingCatalog,
    counters: &CounterState,
) -> String {
    let formatted: Vec<String> = (0..=level)
        .map(|l| {
            let format = catalog
                .spec_at(list_id, l)
                .map(|spec| spec.format)
                .unwrap_or_default();
            format_level_number(counters.value(l), format)
        })
        .collect();

    match catalog.spec_at(list_id, level).and_then(|spec| spec.template.as_deref()) {
        Some(template) => {
            let mut label = template.to_string();
            for (index, value) in formatted.iter().enumerate() {
                label = label.replace(&format!("%{}", index + 1), value);
            }
            label
        }
        None => formatted.join("."),
    }
}

/// Format one counter value in the given numbering kind.
pub fn format_level_number(value: u32, format: NumberFormat) -> String {
    match format {
        NumberFormat::Decimal => value.to_string(),
        NumberFormat::LowerLetter => letter_sequence(value, b'a'),
        NumberFormat::UpperLetter => letter_sequence(value, b'A'),
        NumberFormat::LowerRoman => roman(value).to_ascii_lowercase(),
        NumberFormat::UpperRoman => roman(value),
        NumberFormat::Bullet => "\u{2022}".to_string(),
        NumberFormat::Ordinal => ordinal(value),
        NumberFormat::CardinalText => cardinal_words(value),
        NumberFormat::OrdinalText => ordinal_words(value),
        NumberFormat::NumberInDash => format!("- {value} -"),
    }
}

/// Bijective base-26: 1 is `a`, 26 is `z`, 27 is `aa`, 703 is `aaa`.
fn letter_sequence(mut value: u32, base: u8) -> String {
    let mut letters = Vec::new();
    while value > 0 {
        value -= 1;
        letters.push((base + (value % 26) as u8) as char);
        value /= 26;
    }
    letters.iter().rev().collect()
}

const ROMAN_VALUES: [u32; 13] = [1000, 900, 500, 400, 100, 90, 50, 40, 10, 9, 5, 4, 1];
const ROMAN_SYMBOLS: [&str; 13] = [
    "M", "CM", "D", "CD", "C", "XC", "L", "XL", "X", "IX", "V", "IV", "I",
];

/// Subtractive roman numerals; values past 3999 keep accumulating `M`s.
fn roman(mut value: u32) -> String {
    let mut out = String::new();
    for (&threshold, symbol) in ROMAN_VALUES.iter().zip(ROMAN_SYMBOLS) {
        while value >= threshold {
            out.push_str(symbol);
            value -= threshold;
        }
    }
    out
}

/// Decimal with an English ordinal suffix: `1st`, `2nd`, `11th`, `21st`.
fn ordinal(value: u32) -> String {
    let suffix = match (value % 100, value % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{value}{suffix}")
}

const UNITS: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];
const ORDINAL_UNITS: [&str; 20] = [
    "zeroth",
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
];
const ORDINAL_TENS: [&str; 10] = [
    "",
    "",
    "twentieth",
    "thirtieth",
    "fortieth",
    "fiftieth",
    "sixtieth",
    "seventieth",
    "eightieth",
    "ninetieth",
];

/// Lowercase English words for 0 through 999; larger values fall back to
/// the bare decimal string.
fn cardinal_words(value: u32) -> String {
    if value >= 1000 {
        return value.to_string();
    }
    let hundreds = value / 100;
    let rest = value % 100;
    let mut parts = Vec::new();
    if hundreds > 0 {
        parts.push(format!("{} hundred", UNITS[hundreds as usize]));
    }
    if rest > 0 || value == 0 {
        parts.push(tens_units_words(rest));
    }
    parts.join(" ")
}

fn tens_units_words(value: u32) -> String {
    if value < 20 {
        return UNITS[value as usize].to_string();
    }
    let tens = value / 10;
    let units = value % 10;
    if units == 0 {
        TENS[tens as usize].to_string()
    } else {
        format!("{}-{}", TENS[tens as usize], UNITS[units as usize])
    }
}

/// Lowercase English ordinal words for 0 through 999, decimal past that.
fn ordinal_words(value: u32) -> String {
    if value >= 1000 {
        return value.to_string();
    }
    let hundreds = value / 100;
    let rest = value % 100;
    if rest == 0 {
        if hundreds == 0 {
            return ORDINAL_UNITS[0].to_string();
        }
        return format!("{} hundredth", UNITS[hundreds as usize]);
    }
    let tail = if rest < 20 {
        ORDINAL_UNITS[rest as usize].to_string()
    } else {
        let tens = rest / 10;
        let units = rest % 10;
        if units == 0 {
            ORDINAL_TENS[tens as usize].to_string()
        } else {
            format!("{}-{}", TENS[tens as usize], ORDINAL_UNITS[units as usize])
        }
    };
    if hundreds > 0 {
        format!("{} hundred {}", UNITS[hundreds as usize], tail)
    } else {
        tail
    }
}

// Numbering tokens typed into body text, e.g. "1.2\tScope" or "(a)\tFee".
// The token must be followed by whitespace and enough remaining text to be
// a real paragraph, which keeps bare URLs and one-letter stubs out.
static MANUAL_NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // hierarchical decimals, and single numbers only with a closing dot
        Regex::new(r"(?s)^(\d+(?:\.\d+)+\.?|\d+\.)\s+(\S.{3,})$").unwrap(),
        // parenthesized short tokens: (a), (iv), (12)
        Regex::new(r"(?s)^(\((?:\d{1,3}|[A-Za-z]|[ivxIVX]{1,4})\))\s+(\S.{3,})$").unwrap(),
        // roman tokens with a closing dot: iv., XII.
        Regex::new(r"(?s)^([ivxlcdmIVXLCDM]{1,6}\.)\s+(\S.{3,})$").unwrap(),
        // single letters with a closing dot: A., b.
        Regex::new(r"(?s)^([A-Za-z]\.)\s+(\S.{3,})$").unwrap(),
    ]
});

/// Detect a manual numbering token at the start of a paragraph's visible
/// text and return it as written.
pub fn detect_manual_number(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for pattern in MANUAL_NUMBER_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            if let Some(token) = captures.get(1) {
                return Some(token.as_str().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const WML: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn numbering_doc() -> String {
        format!(
            r#"<w:numbering xmlns:w="{WML}">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
    <w:lvl w:ilvl="1"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2"/></w:lvl>
    <w:lvl w:ilvl="2"><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="(%3)"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#
        )
    }

    fn numbered_paragraph(num_id: i64, ilvl: usize) -> String {
        format!(
            r#"<w:p xmlns:w="{WML}"><w:pPr><w:numPr><w:ilvl w:val="{ilvl}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr></w:p>"#
        )
    }

    #[test]
    fn test_letter_sequences_are_bijective_base_26() {
        assert_eq!(format_level_number(1, NumberFormat::LowerLetter), "a");
        assert_eq!(format_level_number(26, NumberFormat::LowerLetter), "z");
        assert_eq!(format_level_number(27, NumberFormat::LowerLetter), "aa");
        assert_eq!(format_level_number(703, NumberFormat::LowerLetter), "aaa");
        assert_eq!(format_level_number(28, NumberFormat::UpperLetter), "AB");
    }

    #[test]
    fn test_roman_numerals_are_subtractive() {
        assert_eq!(format_level_number(4, NumberFormat::UpperRoman), "IV");
        assert_eq!(format_level_number(9, NumberFormat::LowerRoman), "ix");
        assert_eq!(format_level_number(1994, NumberFormat::LowerRoman), "mcmxciv");
        assert_eq!(format_level_number(4000, NumberFormat::UpperRoman), "MMMM");
    }

    #[test]
    fn test_ordinal_suffixes_handle_teens() {
        assert_eq!(format_level_number(1, NumberFormat::Ordinal), "1st");
        assert_eq!(format_level_number(2, NumberFormat::Ordinal), "2nd");
        assert_eq!(format_level_number(3, NumberFormat::Ordinal), "3rd");
        assert_eq!(format_level_number(11, NumberFormat::Ordinal), "11th");
        assert_eq!(format_level_number(12, NumberFormat::Ordinal), "12th");
        assert_eq!(format_level_number(13, NumberFormat::Ordinal), "13th");
        assert_eq!(format_level_number(21, NumberFormat::Ordinal), "21st");
        assert_eq!(format_level_number(101, NumberFormat::Ordinal), "101st");
        assert_eq!(format_level_number(111, NumberFormat::Ordinal), "111th");
    }

    #[test]
    fn test_cardinal_words_cover_three_digits() {
        assert_eq!(format_level_number(0, NumberFormat::CardinalText), "zero");
        assert_eq!(format_level_number(14, NumberFormat::CardinalText), "fourteen");
        assert_eq!(format_level_number(21, NumberFormat::CardinalText), "twenty-one");
        assert_eq!(format_level_number(40, NumberFormat::CardinalText), "forty");
        assert_eq!(
            format_level_number(123, NumberFormat::CardinalText),
            "one hundred twenty-three"
        );
        assert_eq!(format_level_number(1000, NumberFormat::CardinalText), "1000");
    }

    #[test]
    fn test_ordinal_words_cover_three_digits() {
        assert_eq!(format_level_number(1, NumberFormat::OrdinalText), "first");
        assert_eq!(format_level_number(12, NumberFormat::OrdinalText), "twelfth");
        assert_eq!(format_level_number(21, NumberFormat::OrdinalText), "twenty-first");
        assert_eq!(format_level_number(30, NumberFormat::OrdinalText), "thirtieth");
        assert_eq!(format_level_number(100, NumberFormat::OrdinalText), "one hundredth");
        assert_eq!(
            format_level_number(245, NumberFormat::OrdinalText),
            "two hundred forty-fifth"
        );
    }

    #[test]
    fn test_special_formats() {
        assert_eq!(format_level_number(7, NumberFormat::Bullet), "\u{2022}");
        assert_eq!(format_level_number(7, NumberFormat::NumberInDash), "- 7 -");
        assert_eq!(NumberFormat::from_attr("unheardOf"), NumberFormat::Decimal);
    }

    #[test]
    fn test_advance_resets_deeper_levels() {
        let mut counters = CounterState::from([1, 2, 3, 4, 0, 0, 0, 0, 0]);
        counters.advance(1);
        assert_eq!(counters.value(0), 1);
        assert_eq!(counters.value(1), 3);
        assert_eq!(counters.value(2), 0);
        assert_eq!(counters.value(3), 0);
    }

    #[test]
    fn test_advance_clamps_deep_levels() {
        let mut counters = CounterState::new();
        counters.advance(40);
        assert_eq!(counters.value(MAX_LEVELS - 1), 1);
    }

    #[test]
    fn test_label_replay_with_templates() {
        let xml = numbering_doc();
        let part = XmlDocument::parse(&xml).unwrap();
        let catalog = NumberingCatalog::from_part(Some(&part));
        let mut counters = CounterState::new();

        let sequence = [(1, 0, "1."), (1, 1, "1.1"), (1, 1, "1.2"), (1, 2, "(a)"), (1, 0, "2.")];
        for (num_id, ilvl, expected) in sequence {
            let xml = numbered_paragraph(num_id, ilvl);
            let doc = XmlDocument::parse(&xml).unwrap();
            let label = track_direct_numbering(&doc.root_element(), &catalog, &mut counters);
            assert_eq!(label.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_unknown_list_consumes_no_counters() {
        let xml = numbering_doc();
        let part = XmlDocument::parse(&xml).unwrap();
        let catalog = NumberingCatalog::from_part(Some(&part));
        let mut counters = CounterState::new();

        let unknown = numbered_paragraph(99, 0);
        let doc = XmlDocument::parse(&unknown).unwrap();
        assert_eq!(
            track_direct_numbering(&doc.root_element(), &catalog, &mut counters),
            None
        );
        assert_eq!(counters, CounterState::new());
    }

    #[test]
    fn test_missing_level_spec_falls_back_to_joined_decimals() {
        let xml = format!(
            r#"<w:numbering xmlns:w="{WML}">
  <w:abstractNum w:abstractNumId="3">
    <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="7"><w:abstractNumId w:val="3"/></w:num>
</w:numbering>"#
        );
        let part = XmlDocument::parse(&xml).unwrap();
        let catalog = NumberingCatalog::from_part(Some(&part));
        let mut counters = CounterState::new();

        for (ilvl, expected) in [(0, "1."), (4, "1.0.0.0.1")] {
            let xml = numbered_paragraph(7, ilvl);
            let doc = XmlDocument::parse(&xml).unwrap();
            let label = track_direct_numbering(&doc.root_element(), &catalog, &mut counters);
            assert_eq!(label.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_absent_part_yields_empty_catalog() {
        let catalog = NumberingCatalog::from_part(None);
        assert!(catalog.is_empty());
        assert!(!catalog.has_list(1));
    }

    #[test]
    fn test_manual_tokens_accepted() {
        assert_eq!(detect_manual_number("1.\tScope of work"), Some("1.".into()));
        assert_eq!(detect_manual_number("2.14 Payment terms"), Some("2.14".into()));
        assert_eq!(detect_manual_number("(a)\tFirst carve-out"), Some("(a)".into()));
        assert_eq!(detect_manual_number("(iv) Fourth carve-out"), Some("(iv)".into()));
        assert_eq!(detect_manual_number("iv.\tRoman clause"), Some("iv.".into()));
        assert_eq!(detect_manual_number("B. Appendix body"), Some("B.".into()));
    }

    #[test]
    fn test_manual_tokens_rejected() {
        assert_eq!(detect_manual_number("1.Foo"), None);
        assert_eq!(detect_manual_number("1. X"), None);
        assert_eq!(detect_manual_number("www.example.com New domain"), None);
        assert_eq!(detect_manual_number("Plain prose paragraph."), None);
        assert_eq!(detect_manual_number(""), None);
    }
}
