//! Paginated PDF rendering of a normalized table.
//!
//! Landscape A4, one centred title line on page 1, then a bold header band
//! and bordered row bands. Layout math runs in millimetres with a top-left
//! origin and is converted to PDF points when operators are emitted.
//! Before each row the cursor is checked against the printable height; a
//! break starts a fresh page and re-emits the header band, so every page
//! is self-describing. Cell text is never wrapped or truncated — the
//! column-width cap keeps wide columns from dominating the page, and
//! anything longer simply overruns its box.

use super::metrics::text_width_mm;
use crate::error::RenderError;
use crate::process::NormalizedTable;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

const PAGE_W_MM: f32 = 297.0;
const PAGE_H_MM: f32 = 210.0;
const MARGIN_MM: f32 = 10.0;
/// Bottom margin that triggers the page break.
const BREAK_MARGIN_MM: f32 = 15.0;
const ROW_H_MM: f32 = 10.0;
const TITLE_GAP_MM: f32 = 10.0;
const TITLE_PT: f32 = 16.0;
const BODY_PT: f32 = 10.0;
/// Breathing room added to the widest content of a column.
const COL_PAD_MM: f32 = 6.0;
/// Ceiling on any single column, so free-text columns cannot take over.
const MAX_COL_W_MM: f32 = 60.0;
/// Inset between a cell border and left-aligned text.
const TEXT_INSET_MM: f32 = 1.5;

const MM_TO_PT: f32 = 72.0 / 25.4;
const PT_TO_MM: f32 = 25.4 / 72.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Render `table` as a paginated PDF with `title` centred on page 1.
pub fn render(table: &NormalizedTable, title: &str) -> Result<Vec<u8>, RenderError> {
    if table.is_empty() {
        return Err(RenderError::NoData);
    }

    let widths = column_widths(table);
    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = MARGIN_MM;

    // title band, then a gap before the grid
    let title_w = text_width_mm(title, TITLE_PT);
    text(
        &mut ops,
        FONT_BOLD,
        TITLE_PT,
        ((PAGE_W_MM - title_w) / 2.0).max(MARGIN_MM),
        baseline(y, TITLE_PT),
        title,
    );
    y += ROW_H_MM + TITLE_GAP_MM;

    header_band(&mut ops, table, &widths, y);
    y += ROW_H_MM;

    for row in &table.rows {
        if y + ROW_H_MM > PAGE_H_MM - BREAK_MARGIN_MM {
            pages.push(std::mem::take(&mut ops));
            y = MARGIN_MM;
            header_band(&mut ops, table, &widths, y);
            y += ROW_H_MM;
        }
        let mut x = MARGIN_MM;
        for (cell, w) in row.iter().zip(&widths) {
            cell_box(&mut ops, x, y, *w);
            text(
                &mut ops,
                FONT_REGULAR,
                BODY_PT,
                x + TEXT_INSET_MM,
                baseline(y, BODY_PT),
                cell,
            );
            x += w;
        }
        y += ROW_H_MM;
    }
    pages.push(ops);

    debug!(pages = pages.len(), rows = table.rows.len(), "laid out pdf");
    build_document(pages)
}

/// Column width: the wider of header and cells, padded, then capped.
fn column_widths(table: &NormalizedTable) -> Vec<f32> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut content = text_width_mm(name, BODY_PT);
            for row in &table.rows {
                if let Some(cell) = row.get(i) {
                    content = content.max(text_width_mm(cell, BODY_PT));
                }
            }
            (content + COL_PAD_MM).min(MAX_COL_W_MM)
        })
        .collect()
}

/// Baseline for text vertically centred in a band starting at `y_top`.
fn baseline(y_top: f32, size_pt: f32) -> f32 {
    y_top + (ROW_H_MM + size_pt * PT_TO_MM * 0.7) / 2.0
}

fn header_band(ops: &mut Vec<Operation>, table: &NormalizedTable, widths: &[f32], y: f32) {
    let mut x = MARGIN_MM;
    for (name, w) in table.columns.iter().zip(widths) {
        cell_box(ops, x, y, *w);
        let name_w = text_width_mm(name, BODY_PT);
        let tx = x + ((w - name_w) / 2.0).max(TEXT_INSET_MM);
        text(ops, FONT_BOLD, BODY_PT, tx, baseline(y, BODY_PT), name);
        x += w;
    }
}

/// Stroke a cell border. `y_top` is the band's top edge in page-space mm.
fn cell_box(ops: &mut Vec<Operation>, x: f32, y_top: f32, w: f32) {
    ops.push(Operation::new(
        "re",
        vec![
            Object::Real(x * MM_TO_PT),
            Object::Real((PAGE_H_MM - y_top - ROW_H_MM) * MM_TO_PT),
            Object::Real(w * MM_TO_PT),
            Object::Real(ROW_H_MM * MM_TO_PT),
        ],
    ));
    ops.push(Operation::new("S", vec![]));
}

fn text(ops: &mut Vec<Operation>, font: &str, size_pt: f32, x: f32, baseline_mm: f32, s: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![font.into(), Object::Real(size_pt)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![
            Object::Real(x * MM_TO_PT),
            Object::Real((PAGE_H_MM - baseline_mm) * MM_TO_PT),
        ],
    ));
    ops.push(Operation::new("Tj", vec![Object::string_literal(s)]));
    ops.push(Operation::new("ET", vec![]));
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    });

    let mut kids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::LayoutFailure(format!("encoding content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        kids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(PAGE_W_MM * MM_TO_PT),
                Object::Real(PAGE_H_MM * MM_TO_PT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| RenderError::LayoutFailure(format!("writing document: {e}")))?;
    Ok(out)
}
