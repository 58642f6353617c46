//! Integration tests for the full report pipeline:
//! extraction -> dataset -> KPIs -> (chart, summary) -> export.

use report_engine::{
    combine_inputs, compute_kpis, render_region_chart, BrandColor, ChartStyle, Dataset,
    DetailLevel, DocumentInput, ExportFormat, SummaryContext, Summarizer, UploadedFile,
};
use report_engine::testing::{FailingSummarizer, MockSummarizer};

const SALES_CSV: &str = "Region,Revenue,Date\n\
East,5400,2024-03-01\n\
West,3200,2024-03-05\n\
East,7000,2024-03-20\n\
West,2100,2024-02-10\n";

fn context() -> SummaryContext {
    SummaryContext {
        brand: "Acme Analytics".to_string(),
        industry: "retail".to_string(),
        sections: vec!["Executive Summary".to_string(), "KPIs".to_string()],
        detail: DetailLevel::Medium,
        creativity: 0.3,
    }
}

#[tokio::test]
async fn csv_upload_flows_through_to_both_export_formats() {
    // Extraction
    let files = vec![UploadedFile::new("sales.csv", SALES_CSV.as_bytes().to_vec())];
    let text = combine_inputs(&files, None).unwrap();
    assert!(text.contains("East,5400"));

    // Aggregation
    let dataset = Dataset::from_csv(&text).unwrap();
    let kpis = compute_kpis(&dataset);
    assert_eq!(kpis.total_revenue, Some(17700.0));
    let by_region = kpis.by_region.as_ref().unwrap();
    assert_eq!(by_region.get_index(0), Some((&"East".to_string(), &12400.0)));

    // Chart + summary
    let chart = render_region_chart(by_region, &ChartStyle::default())
        .unwrap()
        .expect("two regions should chart");
    let summarizer = MockSummarizer::new("East led the quarter at 12,400.");
    let summary = summarizer.summarize(&kpis, &context()).await.unwrap();

    // Export
    let mut input = DocumentInput::new("Q1 Review", summary);
    input.kpi_lines = kpis.lines();
    input.chart_png = Some(chart);
    input.brand_color = BrandColor { r: 10, g: 90, b: 60 };

    let pdf = ExportFormat::Pdf.compose(&input).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    let docx = ExportFormat::Docx.compose(&input).unwrap();
    assert!(docx.starts_with(b"PK"));

    // The mock saw the real bundle
    let calls = summarizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].brand, "Acme Analytics");
    assert!(calls[0].kpi_keys.contains(&"by_region"));
}

#[tokio::test]
async fn upstream_failure_surfaces_without_retry() {
    let dataset = Dataset::from_csv("Revenue\n100\n").unwrap();
    let kpis = compute_kpis(&dataset);

    let err = FailingSummarizer
        .summarize(&kpis, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, report_engine::ReportError::Upstream(_)));
}

#[test]
fn dataset_without_kpi_columns_still_exports_a_document() {
    let dataset = Dataset::from_csv("Product,Units\nWidget,3\n").unwrap();
    let kpis = compute_kpis(&dataset);
    assert!(kpis.is_empty());
    assert!(kpis.lines().is_empty());

    // No chart, no logo, empty KPI section - export still succeeds.
    let input = DocumentInput::new("Inventory Brief", "Nothing notable this period.");
    let pdf = ExportFormat::Pdf.compose(&input).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}
