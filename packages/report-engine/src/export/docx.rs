//! DOCX composer built on `docx-rs`.

use docx_rs::{Docx, Paragraph, Pic, Run};

use super::{decode_embed, DocumentComposer, DocumentInput};
use crate::error::{ReportError, Result};

// 9525 EMU per pixel at 96dpi
const EMU_PER_PX: u32 = 9525;
const LOGO_WIDTH_PX: u32 = 150;
const CHART_WIDTH_PX: u32 = 620;

/// Composes the report as a DOCX document.
pub struct DocxComposer;

impl DocumentComposer for DocxComposer {
    fn compose(&self, input: &DocumentInput) -> Result<Vec<u8>> {
        let mut docx = Docx::new();

        if let Some(para) = image_paragraph("logo", input.logo.as_deref(), LOGO_WIDTH_PX) {
            docx = docx.add_paragraph(para);
        }

        docx = docx.add_paragraph(
            Paragraph::new().add_run(
                Run::new()
                    .add_text(input.title.as_str())
                    .size(44)
                    .bold()
                    .color(input.brand_color.hex()),
            ),
        );

        for paragraph in input.summary.split('\n').filter(|p| !p.trim().is_empty()) {
            docx = docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text(paragraph).size(22)));
        }

        if !input.kpi_lines.is_empty() {
            docx = docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("KPIs").size(28).bold()),
            );
            for (key, value) in &input.kpi_lines {
                docx = docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(format!("{key}: {value}")).size(22)),
                );
            }
        }

        if let Some(para) = image_paragraph("chart", input.chart_png.as_deref(), CHART_WIDTH_PX) {
            docx = docx.add_paragraph(para);
        }

        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build()
            .pack(&mut cursor)
            .map_err(|e| ReportError::Export(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Build an image paragraph scaled to `target_width_px`, or `None` when the
/// bytes are absent or undecodable (skip, never fail).
fn image_paragraph(kind: &str, bytes: Option<&[u8]>, target_width_px: u32) -> Option<Paragraph> {
    let bytes = bytes?;
    let decoded = decode_embed(kind, bytes)?;

    // EMU math in u64: extreme aspect ratios overflow u32.
    let width = u64::from(decoded.width().max(1));
    let height = u64::from(decoded.height().max(1));
    let target_height_px = (u64::from(target_width_px) * height / width).max(1);

    let width_emu = u64::from(target_width_px) * u64::from(EMU_PER_PX);
    let height_emu = target_height_px * u64::from(EMU_PER_PX);
    let (Ok(width_emu), Ok(height_emu)) = (u32::try_from(width_emu), u32::try_from(height_emu))
    else {
        tracing::warn!(kind, "image too large for document embed, skipping");
        return None;
    };

    let pic = Pic::new(bytes).size(width_emu, height_emu);
    Some(Paragraph::new().add_run(Run::new().add_image(pic)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_image_bytes_yield_no_paragraph() {
        assert!(image_paragraph("logo", Some(b"garbage"), LOGO_WIDTH_PX).is_none());
        assert!(image_paragraph("logo", None, LOGO_WIDTH_PX).is_none());
    }

    #[test]
    fn extreme_aspect_ratio_logo_is_skipped_not_fatal() {
        let tall = {
            let img = image::RgbImage::from_pixel(1, 8000, image::Rgb([10, 10, 10]));
            let mut out = std::io::Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(img)
                .write_to(&mut out, image::ImageOutputFormat::Png)
                .unwrap();
            out.into_inner()
        };

        // Scaled height would exceed the EMU range; the embed is dropped.
        assert!(image_paragraph("logo", Some(&tall), LOGO_WIDTH_PX).is_none());

        // The rest of the document still composes.
        let mut input = DocumentInput::new("Monthly Brief", "Steady quarter overall.");
        input.logo = Some(tall);
        let bytes = DocxComposer.compose(&input).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn compose_produces_a_zip_container() {
        let input = DocumentInput::new("Monthly Brief", "Steady quarter overall.");
        let bytes = DocxComposer.compose(&input).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
