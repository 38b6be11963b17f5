//! Request timeout middleware.
//!
//! A handler that outlives the limit is dropped (cancelled) and the client
//! still gets a well-formed error body: `UNKNOWN_ERROR` with status 504.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use faultline_taxonomy::ServiceError;

use crate::error::ApiError;

/// Cancels requests running longer than `limit`. A zero limit disables it.
pub async fn timeout_middleware(
    State(limit): State<Duration>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if limit.is_zero() {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path().to_owned();
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(%path, timeout_ms, "request timed out");
            Err(ServiceError::service("request timed out")
                .status(StatusCode::GATEWAY_TIMEOUT)
                .detail("timeout_ms", timeout_ms)
                .into())
        }
    }
}
