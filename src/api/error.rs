use super::protocol::ErrorBody;
use crate::store::error::StoreError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Every way a request can fail, mapped onto a status code by `IntoResponse`.
///
/// Client errors carry an empty body. Storage failures carry an `ErrorBody` so that a
/// broken document is never mistaken for a successful response.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Post not found: {0}")]
    NotFound(u64),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(StoreError::Io { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Validation(reason) => {
                tracing::warn!("Rejected request: {}", reason);
                status.into_response()
            }
            ApiError::NotFound(id) => {
                tracing::debug!("Post {} not found", id);
                status.into_response()
            }
            ApiError::MethodNotAllowed => status.into_response(),
            ApiError::Store(err) => {
                tracing::error!("Store failure: {}", err);
                let code = match err {
                    StoreError::Io { .. } => "storage_unavailable",
                    StoreError::Format { .. } | StoreError::Inconsistent { .. } => {
                        "corrupt_document"
                    }
                    StoreError::IdsExhausted => "ids_exhausted",
                };
                (
                    status,
                    Json(ErrorBody {
                        error: code.to_string(),
                        message: err.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
