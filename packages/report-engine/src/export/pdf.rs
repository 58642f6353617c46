//! PDF composer built on `printpdf`'s canvas model.

use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rgb,
};

use super::{decode_embed, DocumentComposer, DocumentInput};
use crate::error::{ReportError, Result};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const BODY_LINE_MM: f32 = 5.5;
const LOGO_WIDTH_MM: f32 = 40.0;
const CHART_WIDTH_MM: f32 = 170.0;
const IMAGE_DPI: f32 = 300.0;
// Helvetica at 11pt fits roughly this many characters across the text column
const WRAP_COLUMNS: usize = 95;

/// Composes the report as an A4 PDF.
pub struct PdfComposer;

impl DocumentComposer for PdfComposer {
    fn compose(&self, input: &DocumentInput) -> Result<Vec<u8>> {
        let (doc, page, layer) =
            PdfDocument::new(&input.title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");

        let body_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Export(e.to_string()))?;
        let bold_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Export(e.to_string()))?;

        let mut writer = PageWriter {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        };

        // Logo, top-left at fixed width. Undecodable bytes are skipped.
        if let Some(logo) = input.logo.as_deref().and_then(|b| decode_embed("logo", b)) {
            writer.draw_image(&logo, LOGO_WIDTH_MM);
            writer.y -= 4.0;
        }

        // Title in the brand color
        let (r, g, b) = input.brand_color.as_tuple();
        writer.layer.set_fill_color(Color::Rgb(Rgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            None,
        )));
        writer.ensure_space(12.0);
        writer.y -= 8.0;
        writer.text_line(&input.title, 22.0, &bold_font);
        writer.y -= 6.0;

        // Body prose in black
        writer
            .layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        for line in wrap_text(&input.summary, WRAP_COLUMNS) {
            writer.ensure_space(BODY_LINE_MM);
            writer.text_line(&line, 11.0, &body_font);
            writer.y -= BODY_LINE_MM;
        }

        // KPI listing
        if !input.kpi_lines.is_empty() {
            writer.y -= 4.0;
            writer.ensure_space(10.0 + input.kpi_lines.len() as f32 * BODY_LINE_MM);
            writer.text_line("KPIs", 14.0, &bold_font);
            writer.y -= 7.0;
            for (key, value) in &input.kpi_lines {
                writer.ensure_space(BODY_LINE_MM);
                writer.text_line(&format!("{key}: {value}"), 11.0, &body_font);
                writer.y -= BODY_LINE_MM;
            }
        }

        // Chart, full text-column width
        if let Some(chart) = input
            .chart_png
            .as_deref()
            .and_then(|b| decode_embed("chart", b))
        {
            writer.y -= 6.0;
            writer.draw_image(&chart, CHART_WIDTH_MM);
        }

        doc.save_to_bytes()
            .map_err(|e| ReportError::Export(e.to_string()))
    }
}

/// Tracks the vertical cursor and starts fresh pages as content flows.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter<'_> {
    fn ensure_space(&mut self, needed_mm: f32) {
        if self.y - needed_mm < MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn text_line(&mut self, text: &str, size_pt: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(text, size_pt, Mm(MARGIN_MM), Mm(self.y), font);
    }

    /// Place an image scaled to `target_width_mm`, advancing the cursor past it.
    fn draw_image(&mut self, img: &image::DynamicImage, target_width_mm: f32) {
        let natural_width_mm = img.width() as f32 * 25.4 / IMAGE_DPI;
        let natural_height_mm = img.height() as f32 * 25.4 / IMAGE_DPI;
        let scale = target_width_mm / natural_width_mm;
        let height_mm = natural_height_mm * scale;

        self.ensure_space(height_mm);
        let bottom = self.y - height_mm;

        Image::from_dynamic_image(img).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(bottom)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        self.y = bottom - 2.0;
    }
}

/// Word-wrap into lines of at most `columns` characters, preserving
/// paragraph breaks. Words longer than a line are hard-broken.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            for piece in break_word(word, columns) {
                if !current.is_empty()
                    && current.chars().count() + piece.chars().count() + 1 > columns
                {
                    lines.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(piece);
            }
        }
        lines.push(current);
    }
    lines
}

/// Split a word into chunks of at most `columns` characters.
fn break_word(word: &str, columns: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = word;
    while rest.chars().count() > columns {
        let split = rest
            .char_indices()
            .nth(columns)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(split);
        pieces.push(head);
        rest = tail;
    }
    pieces.push(rest);
    pieces
}
