//! HTTP API route handlers.

pub mod catalog;
pub mod raise;
pub mod system;

use axum::http::{StatusCode, Uri};
use faultline_taxonomy::ServiceError;

use crate::error::ApiError;

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ServiceError::service("no route for path")
        .status(StatusCode::NOT_FOUND)
        .detail("path", uri.path())
        .into()
}
