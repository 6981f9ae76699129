use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = ?self.message, "request failed");
        }
        let body = ErrorBody { error: self.title, message: self.message.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let msg = Some(e.to_string());
        match e {
            ServiceError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, "Invalid Input", msg),
            ServiceError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", msg),
            ServiceError::Storage(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", msg),
        }
    }
}

/// Body decode failures: a field of the wrong type is a validation error like any other bad payload.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let msg = Some(rejection.body_text());
        match rejection {
            JsonRejection::JsonDataError(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            JsonRejection::JsonSyntaxError(_) => Self::new(StatusCode::BAD_REQUEST, "Invalid JSON", msg),
            JsonRejection::MissingJsonContentType(_) => {
                Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type", msg)
            }
            other => Self::new(other.status(), "Invalid Request", msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(#[from] service::storage::StorageError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
