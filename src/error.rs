use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Not found")]
    NotFound,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Store unavailable")]
    StoreUnavailable,
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!("❌ Store error: {}", e);

        match e {
            StoreError::Unavailable(_) => AppError::StoreUnavailable,
            StoreError::PermissionDenied => AppError::PermissionDenied,
            StoreError::NotFound(_) => AppError::NotFound,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, self.to_string()).into_response()
    }
}
