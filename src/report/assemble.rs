//! Report serialization
//!
//! Renders the abstract [`ReportTable`] into `.docx` bytes with the
//! `docx-rs` builder. Markup provenance lands twice on purpose: as a named
//! character style, so a reviewer can restyle all insertions at once, and
//! as direct formatting, so the report reads correctly in viewers that
//! ignore character styles.

use anyhow::{Context, Result};
use docx_rs::{
    BreakType, Docx, Paragraph, Run, Style, StyleType, Table, TableCell, TableLayoutType,
    TableRow, VertAlignType, WidthType,
};

use crate::config::MarkupColors;
use crate::extract::models::{ChangeKind, RenderedParagraph, RenderedSegment, SegmentKind, VertAlign};

use super::table::{COLUMN_HEADERS, ReportRow, ReportSection, ReportTable, TABLE_WIDTH_DXA, column_widths};

/// Serialize the report to `.docx` bytes.
pub fn assemble_report(table: &ReportTable, colors: &MarkupColors) -> Result<Vec<u8>> {
    let widths = column_widths(table.with_annotations);

    let mut docx = Docx::new();
    for style in report_styles(colors) {
        docx = docx.add_style(style);
    }

    for section in &table.sections {
        docx = docx.add_paragraph(
            Paragraph::new()
                .style("FileName")
                .add_run(Run::new().add_text(section.title.as_str())),
        );
        docx = docx.add_table(section_table(section, &widths));
        // breathing room between consecutive section tables
        docx = docx.add_paragraph(Paragraph::new().style("Normal"));
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .context("failed to pack report package")?;
    Ok(buffer.into_inner())
}

/// Paragraph styles for body and file-name text, character styles for
/// markup provenance.
fn report_styles(colors: &MarkupColors) -> Vec<Style> {
    vec![
        Style::new("Normal", StyleType::Paragraph).name("Normal").size(20),
        Style::new("FileName", StyleType::Paragraph)
            .name("File Name")
            .size(24)
            .bold(),
        Style::new("Insertion", StyleType::Character)
            .name("Insertion")
            .color(hex(&colors.insertion)),
        Style::new("Deletion", StyleType::Character)
            .name("Deletion")
            .color(hex(&colors.deletion)),
        Style::new("MoveFrom", StyleType::Character)
            .name("Move From")
            .color(hex(&colors.move_from)),
        Style::new("MoveTo", StyleType::Character)
            .name("Move To")
            .color(hex(&colors.move_to)),
        Style::new("CommentAnchor", StyleType::Character)
            .name("Comment Anchor")
            .color(hex(&colors.comment_anchor))
            .bold(),
        Style::new("FootnoteAnchor", StyleType::Character)
            .name("Footnote Anchor")
            .color(hex(&colors.footnote_anchor))
            .bold(),
        Style::new("EndnoteAnchor", StyleType::Character)
            .name("Endnote Anchor")
            .color(hex(&colors.endnote_anchor))
            .bold(),
    ]
}

fn hex(color: &str) -> &str {
    color.trim_start_matches('#')
}

fn section_table(section: &ReportSection, widths: &[usize; 5]) -> Table {
    let mut rows = vec![header_row(widths)];
    rows.extend(section.rows.iter().map(|row| data_row(row, widths)));
    Table::new(rows)
        .set_grid(widths.to_vec())
        .width(TABLE_WIDTH_DXA, WidthType::Dxa)
        .layout(TableLayoutType::Fixed)
}

fn header_row(widths: &[usize; 5]) -> TableRow {
    let cells = COLUMN_HEADERS
        .iter()
        .zip(widths)
        .map(|(header, width)| {
            TableCell::new().width(*width, WidthType::Dxa).add_paragraph(
                Paragraph::new()
                    .style("Normal")
                    .add_run(Run::new().add_text(*header).bold()),
            )
        })
        .collect();
    TableRow::new(cells)
}

fn data_row(row: &ReportRow, widths: &[usize; 5]) -> TableRow {
    let mut annotation_cell = TableCell::new().width(widths[4], WidthType::Dxa);
    if row.annotations.is_empty() {
        annotation_cell = annotation_cell.add_paragraph(Paragraph::new().style("Normal"));
    } else {
        for entry in &row.annotations {
            let paragraph = match entry {
                Some(body) => render_paragraph(body),
                None => Paragraph::new().style("Normal"),
            };
            annotation_cell = annotation_cell.add_paragraph(paragraph);
        }
    }

    TableRow::new(vec![
        text_cell(&row.location, widths[0]),
        text_cell(&row.source, widths[1]),
        text_cell(&row.style, widths[2]),
        TableCell::new()
            .width(widths[3], WidthType::Dxa)
            .add_paragraph(render_paragraph(&row.paragraph)),
        annotation_cell,
    ])
}

fn text_cell(text: &str, width: usize) -> TableCell {
    TableCell::new().width(width, WidthType::Dxa).add_paragraph(
        Paragraph::new()
            .style("Normal")
            .add_run(Run::new().add_text(text)),
    )
}

fn render_paragraph(paragraph: &RenderedParagraph) -> Paragraph {
    let mut out = Paragraph::new().style("Normal");
    for segment in &paragraph.segments {
        out = out.add_run(render_segment(segment));
    }
    out
}

fn render_segment(segment: &RenderedSegment) -> Run {
    if segment.kind == SegmentKind::LineBreak {
        return Run::new().add_break(BreakType::TextWrapping);
    }

    let format = &segment.format;
    let text = if format.caps || format.small_caps {
        segment.text.to_uppercase()
    } else {
        segment.text.clone()
    };
    let mut run = Run::new().add_text(text);

    if format.bold {
        run = run.bold();
    }
    if format.italic {
        run = run.italic();
    }
    if format.strike || format.double_strike {
        run = run.strike();
    }
    if let Some(color) = &format.highlight {
        run = run.highlight(color.as_str());
    }
    if let Some(kind) = &format.underline {
        run = run.underline(kind.as_str());
    }
    match format.vert_align {
        Some(VertAlign::Superscript) => {
            run.run_property = run.run_property.vert_align(VertAlignType::SuperScript)
        }
        Some(VertAlign::Subscript) => {
            run.run_property = run.run_property.vert_align(VertAlignType::SubScript)
        }
        None => {}
    }

    if let Some(style_id) = segment.kind.anchor_style_id() {
        run = run.style(style_id).bold();
    } else if let Some(change) = segment.change {
        run = run.style(change.style_id());
        run = match change {
            ChangeKind::Insertion | ChangeKind::MoveTo => run.underline("single"),
            ChangeKind::Deletion | ChangeKind::MoveFrom => run.strike(),
        };
    }
    run
}
