use crate::ingest::REQUIRED_COLUMNS;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Declared filename is not `.csv`/`.txt`.
    UnsupportedFileType,
    /// The multipart body itself could not be read.
    MalformedUpload(String),
    /// The upload exceeded the configured size cap.
    PayloadTooLarge(String),
    /// The file could not be parsed as a table with a header row.
    Parse(String),
    /// Required columns absent from the header.
    MissingColumns {
        /// Absent columns, in required-column order.
        missing: Vec<String>,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display. This is also the `detail` sent to clients.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnsupportedFileType => write!(f, "Please upload a CSV file."),
            AppError::MalformedUpload(msg) => write!(f, "Invalid upload: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Upload too large: {}", msg),
            AppError::Parse(msg) => write!(f, "Could not parse CSV: {}", msg),
            AppError::MissingColumns { missing } => write!(
                f,
                "CSV missing required columns. Required: {}. Missing: {}",
                REQUIRED_COLUMNS.join(", "),
                missing.join(", ")
            ),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// The body is `{"detail": "<message>"}`. Rejections are logged at warn.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        tracing::warn!("Upload rejected ({}): {}", status, detail);

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
