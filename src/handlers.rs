use crate::errors::AppError;
use crate::ingest;
use crate::metrics::{compute_metrics, ScoreBand};
use crate::models::UploadResponse;
use axum::{
    extract::multipart::{Multipart, MultipartError, MultipartRejection},
    http::StatusCode,
    Json,
};
use serde_json::json;

/// Name of the multipart part carrying the CSV payload.
pub const UPLOAD_FIELD: &str = "file";

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "cibil-advisor",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /upload
///
/// Accepts a multipart upload whose `file` part holds a CSV of loan and
/// credit card transactions, and returns the computed credit metrics.
///
/// The filename is checked before the payload is read, so an unsupported
/// file is never parsed.
///
/// # Returns
///
/// * `Result<Json<UploadResponse>, AppError>` - Row count and metrics, or a 400 with `detail`.
pub async fn upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::MalformedUpload(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        tracing::info!("POST /upload - file: {:?}", filename);

        if !ingest::is_supported_filename(&filename) {
            return Err(AppError::UnsupportedFileType);
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        let transactions = ingest::parse_transactions(&bytes)?;
        let metrics = compute_metrics(&transactions);

        tracing::info!(
            "Scored {} rows: score={} ({}), late_payments={}, utilization={}%, accounts={}",
            transactions.len(),
            metrics.score,
            ScoreBand::from_score(metrics.score),
            metrics.late_payments,
            metrics.credit_utilization_percent,
            metrics.new_accounts_last_year
        );

        return Ok(Json(UploadResponse::ok(transactions.len(), metrics)));
    }

    Err(AppError::MalformedUpload(format!(
        "No file uploaded. Send the CSV in a multipart field named '{}'.",
        UPLOAD_FIELD
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::MalformedUpload(err.body_text())
    }
}
