//! Report pipeline routes: session lifecycle, upload, generation, export.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use report_engine::{
    combine_inputs, compute_kpis, render_region_chart, ChartStyle, Dataset, DocumentInput,
    ExportFormat, KpiBundle, ReportError, SummaryContext, UploadedFile,
};

use crate::kernel::ReportConfig;
use crate::server::app::AppState;
use crate::server::routes::ApiError;

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Open a new report session.
pub async fn create_session_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    tracing::debug!(%session_id, "session created");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

#[derive(Serialize)]
pub struct UploadResponse {
    /// Combined extracted characters after truncation
    pub characters: usize,
    pub dataset_rows: Option<usize>,
    pub logo_attached: bool,
}

/// Ingest uploaded files plus optional pasted text and logo.
///
/// Multipart fields: `file` (repeatable, ordered), `text` (pasted last),
/// `logo` (raw image bytes). The first `.csv`/`.xlsx` file also becomes the
/// session's tabular dataset.
pub async fn upload_handler(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    if state.sessions.get(session_id).await.is_none() {
        return Err(ApiError::session_not_found());
    }

    let mut files: Vec<UploadedFile> = Vec::new();
    let mut pasted_text: Option<String> = None;
    let mut logo: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("could not read '{name}': {e}")))?;
                files.push(UploadedFile::new(name, bytes.to_vec()));
            }
            "text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("could not read pasted text: {e}")))?;
                pasted_text = Some(text);
            }
            "logo" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("could not read logo: {e}")))?;
                logo = Some(bytes.to_vec());
            }
            other => {
                tracing::debug!(field = %other, "ignoring unknown multipart field");
            }
        }
    }

    let text = combine_inputs(&files, pasted_text.as_deref())?;
    let dataset = load_dataset(&files)?;

    if text.trim().is_empty() && dataset.is_none() {
        return Err(ReportError::ExtractionEmpty.into());
    }

    let response = UploadResponse {
        characters: text.chars().count(),
        dataset_rows: dataset.as_ref().map(|d| d.rows.len()),
        logo_attached: logo.is_some(),
    };

    state
        .sessions
        .update(session_id, |session| {
            session.extracted_text = Some(text);
            if dataset.is_some() {
                session.dataset = dataset;
            }
            if logo.is_some() {
                session.logo = logo;
            }
            // New inputs invalidate everything derived from the old ones
            session.kpis = None;
            session.summary = None;
            session.chart_png = None;
        })
        .await
        .ok_or_else(ApiError::session_not_found)?;

    Ok(Json(response))
}

/// Load the tabular dataset from the first spreadsheet-like upload, if any.
fn load_dataset(files: &[UploadedFile]) -> Result<Option<Dataset>, ReportError> {
    for file in files {
        match file.extension().as_str() {
            "csv" => {
                let text =
                    String::from_utf8(file.bytes.clone()).map_err(|_| ReportError::Decode {
                        name: file.name.clone(),
                        reason: "not valid UTF-8".to_string(),
                    })?;
                return Dataset::from_csv(&text).map(Some);
            }
            "xlsx" => return Dataset::from_xlsx(&file.bytes).map(Some),
            _ => continue,
        }
    }
    Ok(None)
}

#[derive(Serialize)]
pub struct GenerateReportResponse {
    pub summary: String,
    pub kpis: KpiBundle,
    /// PNG bar chart of per-region revenue, when applicable
    pub chart_png_base64: Option<String>,
}

/// Run aggregation, chart rendering, and summarization for a session.
pub async fn generate_report_handler(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(config): Json<ReportConfig>,
) -> Result<Json<GenerateReportResponse>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(ApiError::session_not_found)?;

    if !session.has_inputs() {
        return Err(ReportError::ExtractionEmpty.into());
    }

    let kpis = session
        .dataset
        .as_ref()
        .map(compute_kpis)
        .unwrap_or_default();

    let chart_png = match &kpis.by_region {
        Some(by_region) => {
            let style = ChartStyle {
                bar_color: config.brand_color.as_tuple(),
                ..ChartStyle::default()
            };
            render_region_chart(by_region, &style)?
        }
        None => None,
    };

    let summarizer = state
        .summarizer
        .as_ref()
        .ok_or(ReportError::MissingCredential)?;

    let ctx = SummaryContext {
        brand: config.title.clone(),
        industry: config.industry.clone(),
        sections: config.sections.clone(),
        detail: config.detail,
        creativity: config.creativity,
    };
    let summary = summarizer.summarize(&kpis, &ctx).await?;

    let response = GenerateReportResponse {
        summary: summary.clone(),
        kpis: kpis.clone(),
        chart_png_base64: chart_png
            .as_deref()
            .map(|png| base64::engine::general_purpose::STANDARD.encode(png)),
    };

    state
        .sessions
        .update(session_id, |s| {
            s.config = Some(config);
            s.kpis = Some(kpis);
            s.summary = Some(summary);
            s.chart_png = chart_png;
        })
        .await
        .ok_or_else(ApiError::session_not_found)?;

    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: String,
}

/// Compose and download the report document.
pub async fn export_handler(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format: ExportFormat = query
        .format
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;

    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(ApiError::session_not_found)?;

    let (Some(config), Some(summary)) = (session.config, session.summary) else {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "report has not been generated for this session yet",
        ));
    };

    let input = DocumentInput {
        title: config.title.clone(),
        summary,
        kpi_lines: session.kpis.map(|k| k.lines()).unwrap_or_default(),
        chart_png: session.chart_png,
        logo: session.logo,
        brand_color: config.brand_color,
    };

    let bytes = format.compose(&input)?;
    let filename = format!("report-{}.{}", session_id.simple(), format.file_extension());

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
