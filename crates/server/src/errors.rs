use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::Message;
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// Per-request failure, converted to the documented status and body.
#[derive(Debug)]
pub enum ApiError {
    InvalidJson,
    Service(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        debug!(error = %e, "rejected request body");
        Self::InvalidJson
    }
}

fn message(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(Message::new(msg))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let e = match self {
            ApiError::InvalidJson => return message(StatusCode::BAD_REQUEST, "Invalid JSON format"),
            ApiError::Service(e) => e,
        };
        match e {
            ServiceError::NotFound(msg) => message(StatusCode::NOT_FOUND, msg),
            ServiceError::Duplicate { .. } | ServiceError::Conflict(_) => {
                let body = Json(serde_json::json!({"Message": e.to_string()}));
                (StatusCode::FOUND, body).into_response()
            }
            ServiceError::MissingFields(_) => message(StatusCode::BAD_REQUEST, e.to_string()),
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                message(StatusCode::BAD_REQUEST, msg)
            }
            other => {
                error!(error = %other, "request failed on the record store");
                message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Initialization failures. The process must not serve requests after one.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("seed failed: {0}")]
    Seed(String),
    #[error("document store unavailable: {0}")]
    Store(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}
