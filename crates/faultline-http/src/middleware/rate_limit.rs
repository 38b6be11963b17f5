//! Rate-limiting middleware. Over-limit requests get `RATE_LIMIT_EXCEEDED` / 429.

use std::net::IpAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use faultline_taxonomy::ServiceError;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracts the client IP from the request.
///
/// `X-Forwarded-For` is only honoured when the server sits behind a trusted
/// proxy; otherwise any client could pick its own rate-limit key.
fn extract_ip(req: &Request, trust_forwarded_for: bool) -> Option<IpAddr> {
    if trust_forwarded_for
        && let Some(xff) = req.headers().get("x-forwarded-for")
        && let Ok(s) = xff.to_str()
        && let Some(first) = s.split(',').next()
        && let Ok(ip) = first.trim().parse::<IpAddr>()
    {
        return Some(ip);
    }

    req.extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limiter = state.rate_limiter();
    if !limiter.is_enabled() {
        return Ok(next.run(req).await);
    }

    if let Some(ip) = extract_ip(&req, state.trust_forwarded_for())
        && let Err(retry_after) = limiter.check(ip)
    {
        tracing::debug!(%ip, "rate limit exceeded");
        return Err(ServiceError::rate_limited("too many requests")
            .detail("limit", limiter.max_requests())
            .detail("retry_after_secs", retry_after.as_secs().max(1))
            .into());
    }

    Ok(next.run(req).await)
}
