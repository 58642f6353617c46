//! Chart rendering.
//!
//! Renders a region -> revenue mapping as a bar chart PNG. Bars follow the
//! mapping's iteration order with height proportional to revenue. Rendering
//! is font-free (no captions or axis labels) so the bitmap backend stays
//! deterministic across hosts; region names live in the KPI listing instead.

use indexmap::IndexMap;
use plotters::prelude::*;

use crate::error::{ReportError, Result};

/// Fixed rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// Bar fill, typically the report's brand color.
    pub bar_color: (u8, u8, u8),
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            bar_color: (31, 119, 180),
        }
    }
}

/// Render a bar chart for the mapping, or `None` when it is empty.
///
/// Never returns a zero-byte or malformed image: an empty mapping short
/// circuits before any drawing happens.
pub fn render_region_chart(
    by_region: &IndexMap<String, f64>,
    style: &ChartStyle,
) -> Result<Option<Vec<u8>>> {
    if by_region.is_empty() {
        return Ok(None);
    }

    let (width, height) = (style.width, style.height);
    let mut raw = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ReportError::Chart(e.to_string()))?;

        let margin: i32 = 40;
        let plot_w = width as i32 - 2 * margin;
        let plot_h = height as i32 - 2 * margin;
        let baseline = height as i32 - margin;

        let max_value = by_region
            .values()
            .copied()
            .fold(0.0_f64, f64::max)
            .max(f64::MIN_POSITIVE);

        let slot = plot_w as f64 / by_region.len() as f64;
        let fill = RGBColor(style.bar_color.0, style.bar_color.1, style.bar_color.2);

        for (i, value) in by_region.values().enumerate() {
            let bar_h = ((value.max(0.0) / max_value) * plot_h as f64).round() as i32;
            let x0 = margin + (i as f64 * slot + slot * 0.15).round() as i32;
            let x1 = margin + (i as f64 * slot + slot * 0.85).round() as i32;
            root.draw(&Rectangle::new(
                [(x0, baseline - bar_h), (x1, baseline)],
                fill.filled(),
            ))
            .map_err(|e| ReportError::Chart(e.to_string()))?;
        }

        // Baseline axis
        root.draw(&PathElement::new(
            vec![(margin, baseline), (width as i32 - margin, baseline)],
            BLACK.stroke_width(2),
        ))
        .map_err(|e| ReportError::Chart(e.to_string()))?;

        root.present()
            .map_err(|e| ReportError::Chart(e.to_string()))?;
    }

    let rgb = image::RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| ReportError::Chart("pixel buffer size mismatch".to_string()))?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageOutputFormat::Png,
        )
        .map_err(|e| ReportError::Chart(e.to_string()))?;

    Ok(Some(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_renders_no_image() {
        let result = render_region_chart(&IndexMap::new(), &ChartStyle::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn non_empty_mapping_renders_a_valid_png() {
        let mut by_region = IndexMap::new();
        by_region.insert("East".to_string(), 12400.0);
        by_region.insert("West".to_string(), 5300.0);

        let png = render_region_chart(&by_region, &ChartStyle::default())
            .unwrap()
            .expect("two bars should produce an image");

        // PNG magic bytes, and decodable at the declared resolution
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 800);
        assert_eq!(decoded.height(), 450);
    }

    #[test]
    fn rendering_is_deterministic_for_the_same_mapping() {
        let mut by_region = IndexMap::new();
        by_region.insert("North".to_string(), 10.0);
        by_region.insert("South".to_string(), 30.0);

        let style = ChartStyle::default();
        let a = render_region_chart(&by_region, &style).unwrap().unwrap();
        let b = render_region_chart(&by_region, &style).unwrap().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_revenue_bars_do_not_panic() {
        let mut by_region = IndexMap::new();
        by_region.insert("East".to_string(), 0.0);

        let png = render_region_chart(&by_region, &ChartStyle::default()).unwrap();
        assert!(png.is_some());
    }
}
