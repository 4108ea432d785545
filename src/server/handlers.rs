//! HTTP endpoint handlers.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, info};

use super::AppState;
use crate::analysis::classify;
use crate::extract::{aggregate, ExtractionError};
use crate::llm::LlmError;
use crate::models::ClauseBuckets;
use crate::repository::DieselError;

/// An error surfaced to the HTTP caller as `{"detail": "..."}`.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFileType(_) => Self::bad_request(err.to_string()),
            other => Self::internal(format!("Error extracting text: {}", other)),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        Self::internal(format!("Analysis request failed: {}", err))
    }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        Self::internal(format!("Database error: {}", err))
    }
}

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// One file pulled out of the multipart body.
struct Upload {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Response body for a successful upload batch.
#[derive(Serialize)]
pub struct UploadResponse {
    combined_text_length: usize,
    summary: Vec<String>,
    ratings: Ratings,
    clauses: ClauseBuckets,
    anomalies: Vec<String>,
}

/// Scores as rendered on the wire: always integers, never null.
#[derive(Serialize)]
struct Ratings {
    risk_score: i32,
    opportunity_score: i32,
}

/// Upload one or more documents and run a combined analysis.
///
/// All-or-nothing: any extraction or oracle failure aborts the batch with
/// no partial result and no log row.
pub async fn upload_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read {}: {}", filename, e)))?
            .to_vec();

        uploads.push(Upload {
            filename,
            content_type,
            bytes,
        });
    }

    if uploads.is_empty() {
        return Err(ApiError::bad_request("No files uploaded"));
    }

    // Extraction shells out to external tools; keep it off the async workers.
    let extractor = state.extractor.clone();
    let extracted: Vec<(String, String)> = tokio::task::spawn_blocking(move || {
        let mut out = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let result = extractor.extract(&upload.bytes, &upload.content_type, &upload.filename)?;
            debug!(
                "Extracted {} via {:?} ({:?} pages)",
                upload.filename, result.method, result.page_count
            );
            out.push((upload.filename, result.text));
        }
        Ok::<_, ExtractionError>(out)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Extraction task failed: {}", e)))??;

    let combined_text = aggregate(&extracted);
    info!(
        "Extracted {} files into {} chars of combined text",
        extracted.len(),
        combined_text.len()
    );

    let completion = state.llm.analyze(&combined_text).await?;
    let analysis = classify(&completion);

    let response_text = serde_json::to_string(&analysis)
        .map_err(|e| ApiError::internal(format!("Failed to serialize analysis: {}", e)))?;
    let entry = state.log_repo.append(&combined_text, &response_text).await?;
    info!("Persisted analysis log entry {}", entry.id);

    Ok(Json(UploadResponse {
        combined_text_length: combined_text.chars().count(),
        summary: analysis.summary,
        ratings: Ratings {
            risk_score: analysis.risk_score.unwrap_or(0),
            opportunity_score: analysis.opportunity_score.unwrap_or(0),
        },
        clauses: analysis.clauses,
        anomalies: analysis.anomalies,
    }))
}

/// One log entry as rendered by `GET /logs/`.
#[derive(Serialize)]
pub struct LogView {
    id: i32,
    request: String,
    response: String,
    timestamp: String,
}

/// Return the full analysis log in insertion order.
pub async fn get_logs(State(state): State<AppState>) -> Result<Json<Vec<LogView>>, ApiError> {
    let entries = state.log_repo.list_all().await.map_err(|e| {
        error!("Failed to list logs: {}", e);
        ApiError::from(e)
    })?;

    let views = entries
        .into_iter()
        .map(|entry| LogView {
            id: entry.id,
            request: entry.request_text,
            response: entry.response_text,
            timestamp: entry.timestamp.to_rfc3339(),
        })
        .collect();

    Ok(Json(views))
}
