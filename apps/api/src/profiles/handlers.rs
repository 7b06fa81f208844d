use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::AdapterDescriptor;
use crate::models::{CandidateProfile, UploadedDocument};
use crate::orchestration::{AdapterAttempt, BenchmarkReport, ParsedProfile, Selection};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ParseQuery {
    /// Run only this adapter instead of the fallback chain.
    pub adapter: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub success: bool,
    pub data: CandidateProfile,
    pub adapter_used: &'static str,
    pub duration_ms: u64,
    pub selection: Selection,
    pub attempts: Vec<AdapterAttempt>,
}

impl From<ParsedProfile> for ParseResponse {
    fn from(parsed: ParsedProfile) -> Self {
        Self {
            success: true,
            data: parsed.profile,
            adapter_used: parsed.adapter_used,
            duration_ms: parsed.duration.as_millis() as u64,
            selection: parsed.selection,
            attempts: parsed.attempts,
        }
    }
}

#[derive(Serialize)]
pub struct BenchmarkResponse {
    pub success: bool,
    pub data: BenchmarkReport,
}

#[derive(Serialize)]
pub struct AdapterListResponse {
    pub success: bool,
    pub data: Vec<AdapterDescriptor>,
}

/// POST /api/v1/profiles/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    query: Result<Query<ParseQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseResponse>, AppError> {
    let Query(query) =
        query.map_err(|e| AppError::Validation(format!("invalid query string: {}", e.body_text())))?;
    let doc = read_upload(multipart).await?;
    info!(
        filename = %doc.filename,
        mime_type = %doc.mime_type,
        bytes = doc.content.len(),
        forced = query.adapter.as_deref().unwrap_or("-"),
        "parse requested"
    );

    let parsed = match query.adapter.as_deref() {
        Some(adapter_id) => state.orchestrator.parse_with(&doc, adapter_id).await?,
        None => state.orchestrator.parse(&doc).await?,
    };
    Ok(Json(parsed.into()))
}

/// POST /api/v1/profiles/benchmark
pub async fn handle_benchmark(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BenchmarkResponse>, AppError> {
    let doc = read_upload(multipart).await?;
    info!(filename = %doc.filename, bytes = doc.content.len(), "benchmark requested");

    let report = state.benchmark.run(&doc).await?;
    Ok(Json(BenchmarkResponse {
        success: true,
        data: report,
    }))
}

/// GET /api/v1/adapters
pub async fn handle_list_adapters(State(state): State<AppState>) -> Json<AdapterListResponse> {
    Json(AdapterListResponse {
        success: true,
        data: state.registry.descriptors().to_vec(),
    })
}

/// Pulls the `file` field out of the multipart body.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedDocument, AppError> {
    let mut multipart = multipart
        .map_err(|e| AppError::Validation(format!("expected a multipart/form-data body: {e}")))?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::Validation(format!("malformed multipart body: {}", e.body_text()))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::Validation("file exceeds the upload size limit".to_string())
            } else {
                AppError::Validation(format!("could not read file field: {}", e.body_text()))
            }
        })?;
        if content.is_empty() {
            return Err(AppError::NoFile(format!("'{filename}' is empty")));
        }
        return Ok(UploadedDocument::new(content, mime_type, filename));
    }

    Err(AppError::NoFile(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}
