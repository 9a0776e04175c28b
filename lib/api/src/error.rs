use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use magicsearch_core::Error;
use serde_json::json;

/// Engine error as an HTTP response
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            Error::EmbeddingUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::CardNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        let body = match &self.0 {
            Error::UnknownAttribute(fields) => json!({
                "error": self.0.to_string(),
                "fields": fields,
            }),
            other => json!({ "error": other.to_string() }),
        };
        HttpResponse::build(status).json(body)
    }
}
