use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

use crate::{groq::UpstreamError, models::ErrorBody, store::StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to generate code: {0}")]
    Generation(#[from] UpstreamError),

    #[error("Failed to access status checks: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Every failure kind collapses to a 500 carrying the underlying text.
        let body = ErrorBody { detail: self.to_string() };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
