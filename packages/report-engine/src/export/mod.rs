//! Document export.
//!
//! Both output formats consume the same normalized [`DocumentInput`], so a
//! third format would only add a composer. Layout order is identical across
//! formats: logo, title, executive summary, KPI listing, chart.
//!
//! Optional images that are missing are omitted; images that fail to decode
//! are logged and skipped without aborting the rest of the document.

mod docx;
mod pdf;

pub use docx::DocxComposer;
pub use pdf::PdfComposer;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Brand accent color applied to the title (and chart bars upstream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BrandColor {
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn as_tuple(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl Default for BrandColor {
    fn default() -> Self {
        // Muted navy
        Self { r: 31, g: 58, b: 95 }
    }
}

/// Normalized input shared by every composer.
#[derive(Debug, Clone, Default)]
pub struct DocumentInput {
    pub title: String,
    pub summary: String,
    /// `key: value` lines from [`crate::kpi::KpiBundle::lines`].
    pub kpi_lines: Vec<(String, String)>,
    pub chart_png: Option<Vec<u8>>,
    pub logo: Option<Vec<u8>>,
    pub brand_color: BrandColor,
}

impl DocumentInput {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            ..Default::default()
        }
    }
}

/// A single "compose document" capability, one impl per output format.
pub trait DocumentComposer {
    fn compose(&self, input: &DocumentInput) -> Result<Vec<u8>>;
}

/// The two supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// Compose the document with the matching composer.
    pub fn compose(&self, input: &DocumentInput) -> Result<Vec<u8>> {
        match self {
            Self::Pdf => PdfComposer.compose(input),
            Self::Docx => DocxComposer.compose(input),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Decode optional embed bytes, skipping (not failing) on corrupt input.
pub(crate) fn decode_embed(kind: &str, bytes: &[u8]) -> Option<image::DynamicImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::warn!(kind, error = %e, "skipping image that could not be embedded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> DocumentInput {
        let mut input = DocumentInput::new(
            "Q1 Performance Review",
            "Revenue grew across both regions, led by East at 12,400.",
        );
        input.kpi_lines = vec![
            ("Total revenue".to_string(), "17700.00".to_string()),
            ("Revenue (East)".to_string(), "12400.00".to_string()),
            ("Revenue (West)".to_string(), "5300.00".to_string()),
        ];
        input
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageOutputFormat::Png,
            )
            .unwrap();
        png
    }

    #[test]
    fn export_format_parses_from_query_strings() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("DOCX".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert!("odt".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn pdf_without_optional_images_succeeds() {
        let bytes = ExportFormat::Pdf.compose(&base_input()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn docx_without_optional_images_succeeds() {
        let bytes = ExportFormat::Docx.compose(&base_input()).unwrap();
        // DOCX is a zip archive
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn corrupt_logo_is_skipped_not_fatal() {
        let mut input = base_input();
        input.logo = Some(b"definitely not an image".to_vec());

        let pdf = ExportFormat::Pdf.compose(&input).unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let docx = ExportFormat::Docx.compose(&input).unwrap();
        assert!(docx.starts_with(b"PK"));
    }

    #[test]
    fn valid_logo_and_chart_embed_in_both_formats() {
        let mut input = base_input();
        input.logo = Some(tiny_png());
        input.chart_png = Some(tiny_png());

        let with_images = ExportFormat::Pdf.compose(&input).unwrap();
        let without = ExportFormat::Pdf.compose(&base_input()).unwrap();
        assert!(with_images.len() > without.len());

        assert!(ExportFormat::Docx.compose(&input).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn brand_color_formats_as_hex() {
        let color = BrandColor { r: 31, g: 58, b: 95 };
        assert_eq!(color.hex(), "1F3A5F");
    }
}
