//! Bearer token authentication middleware.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use faultline_taxonomy::ServiceError;

use crate::error::ApiError;
use crate::state::AppState;

/// Paths exempt from authentication (monitoring).
fn is_exempt(path: &str, method: &Method) -> bool {
    if *method == Method::OPTIONS {
        return true;
    }
    matches!(path, "/health")
}

/// Middleware that checks `Authorization: Bearer <token>` on non-exempt routes.
///
/// When no auth token is configured in `AppState`, all requests pass through.
/// Failures surface as `AUTH_INVALID_TOKEN` / 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(auth) = state.auth() else {
        return Ok(next.run(req).await);
    };

    if is_exempt(req.uri().path(), req.method()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header.map(|val| val.strip_prefix("Bearer ")) {
        Some(Some(token)) if auth.check_bearer(token) => Ok(next.run(req).await),
        Some(Some(_)) => Err(ServiceError::auth("invalid bearer token").into()),
        Some(None) => Err(ServiceError::auth("unsupported authorization scheme").into()),
        None => Err(ServiceError::auth("missing bearer token").into()),
    }
}
