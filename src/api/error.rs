// api/error.rs
use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::error::{ErrorMessage, HttpError};

const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Unexpected upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid query parameters: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

impl ApiError {
    /// Builds a status error from a non-2xx body, pulling out the most useful
    /// human-readable message the platform sent.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| extract_message(&json))
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

        ApiError::Status { status, message }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Status { status, .. } if (400..500).contains(status) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::Status { .. } | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Transport(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// `message`, then `detail`, then `error`, then the first field error of a
/// validation body like `{"ifsc_code": ["Invalid IFSC"]}`.
pub fn extract_message(body: &Value) -> Option<String> {
    for key in ["message", "detail", "error"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return Some(text.to_string());
            }
        }
    }

    body.as_object()?.iter().find_map(|(field, value)| {
        let first = match value {
            Value::Array(items) => items.first()?.as_str()?,
            Value::String(text) => text.as_str(),
            _ => return None,
        };
        Some(format!("{}: {}", field, first))
    })
}

impl From<ApiError> for HttpError {
    fn from(error: ApiError) -> Self {
        let status = error.status_code();
        match error {
            ApiError::Status { message, .. } => HttpError::new(message, status),
            ApiError::Transport(err) => {
                tracing::error!("Upstream transport error: {}", err);
                HttpError::new(ErrorMessage::UpstreamUnavailable.to_string(), status)
            }
            ApiError::Decode(err) => {
                tracing::error!("Upstream decode error: {}", err);
                HttpError::bad_gateway(ErrorMessage::ServerError.to_string())
            }
            ApiError::Query(err) => HttpError::new(err.to_string(), status),
        }
    }
}
