use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Failures talking to the remote appointment API.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API rejected request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// The text the remote API gave for a rejection, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
