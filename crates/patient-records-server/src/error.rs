//! HTTP error responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use patient_records_core::{ServiceError, Violation};

/// Errors a handler can return.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Payload(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorBody<T: Serialize> {
    detail: T,
}

fn error_response<T: Serialize>(status: StatusCode, detail: T) -> Response {
    (status, Json(ErrorBody { detail })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(ServiceError::Validation(e)) => {
                tracing::warn!(error = %e, "Rejected patient payload");
                error_response::<&[Violation]>(StatusCode::UNPROCESSABLE_ENTITY, e.violations())
            }
            ApiError::Service(ServiceError::NotFound(id)) => {
                tracing::warn!(patient_id = %id, "Patient not found");
                error_response(StatusCode::NOT_FOUND, "Patient not found")
            }
            ApiError::Service(ServiceError::Conflict(id)) => {
                tracing::warn!(patient_id = %id, "Patient already exists");
                error_response(StatusCode::BAD_REQUEST, "Patient already exists")
            }
            ApiError::Service(ServiceError::BadRequest(message)) => {
                tracing::warn!(%message, "Bad request");
                error_response(StatusCode::BAD_REQUEST, message)
            }
            ApiError::Service(ServiceError::Storage(e)) => {
                tracing::error!(error = %e, "Patient store failure");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::Payload(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "Malformed request body");
                error_response(rejection.status(), rejection.body_text())
            }
            ApiError::Query(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "Malformed query string");
                error_response(rejection.status(), rejection.body_text())
            }
            ApiError::Join(e) => {
                tracing::error!(error = %e, "Store task failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
