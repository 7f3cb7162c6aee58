use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

/// Failures on the capture path. Each one aborts the request with a
/// plain-text 500; nothing is retried.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[source] std::io::Error),

    #[error("Failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    #[error("Failed to serialize request log: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write {file}: {source}")]
    Persistence {
        file: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    /// Short message sent to the client. Underlying causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            CaptureError::DirectoryCreation(_) => "failed to create log directory".to_string(),
            CaptureError::BodyRead(_) => "failed to read request body".to_string(),
            CaptureError::Serialization(_) => "failed to serialize request log".to_string(),
            CaptureError::Persistence { file, .. } => format!("failed to write {file}"),
        }
    }
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        warn!(error = %self, "request capture failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}
