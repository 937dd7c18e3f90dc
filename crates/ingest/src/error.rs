use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use optikpi_signing::{ConfigurationError, HeaderError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid signature headers: {0}")]
    BadHeaders(#[from] HeaderError),
    #[error("Invalid request body: {0}")]
    BadRequest(String),
    #[error("Unauthorized request: {0}")]
    Unauthorized(String),
    #[error("Signing configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Trait implementation to convert this error into an axum http response
impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = match &self {
            IngestError::BadHeaders(_) | IngestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            IngestError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            IngestError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = if status.is_server_error() {
            "Something wrong happened.".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
