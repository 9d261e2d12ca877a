use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mediadash_sources::SourceError;
use serde_json::json;

/// Newtype wrapper so `SourceError` can be returned from handlers.
pub struct ApiError(pub SourceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            SourceError::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<SourceError> for ApiError {
    fn from(e: SourceError) -> Self {
        Self(e)
    }
}
