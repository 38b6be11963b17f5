//! Error preview endpoint.
//!
//! Builds a `ServiceError` from a request and returns it through the same
//! boundary translator every service uses, so SDK authors can see the exact
//! status line and body a given raise site produces.

use axum::extract::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use faultline_taxonomy::{Domain, ErrorBody, ServiceError};

use crate::error::ApiError;
use crate::types::RaiseRequest;

/// Raise an error and return its wire response.
///
/// The response status is the constructed error's status; the body is its
/// serialized form. Invalid requests fail with `VALIDATION_ERROR`.
#[utoipa::path(
    post,
    path = "/errors/raise",
    request_body = RaiseRequest,
    responses(
        (status = "4XX", description = "The constructed client error", body = ErrorBody),
        (status = "5XX", description = "The constructed server error", body = ErrorBody),
    ),
    tag = "Registry"
)]
pub async fn raise(payload: Result<Json<RaiseRequest>, JsonRejection>) -> ApiError {
    match payload.map_err(ApiError::from).and_then(|Json(req)| build(req)) {
        Ok(err) => ApiError::Service(err),
        Err(invalid) => invalid,
    }
}

fn build(req: RaiseRequest) -> Result<ServiceError, ApiError> {
    let mut builder = ServiceError::build(req.domain, req.message);

    if let Some(code) = req.error_code {
        builder = builder.code(code);
    }

    if let Some(raw) = req.status_code {
        let status = StatusCode::from_u16(raw)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .ok_or_else(|| {
                ServiceError::validation("status_code must be a 4xx or 5xx status")
                    .detail("status_code", raw)
            })?;
        builder = builder.status(status);
    }

    if let Some(details) = req.details {
        builder = builder.details(details);
    }

    match (req.domain, req.service_name) {
        (Domain::ExternalService, Some(name)) => builder = builder.service_name(name),
        (Domain::ExternalService, None) => {
            return Err(ServiceError::validation(
                "service_name is required for external_service errors",
            )
            .detail("domain", req.domain.label())
            .into());
        }
        (domain, Some(_)) => {
            return Err(ServiceError::validation(
                "service_name is only accepted for external_service errors",
            )
            .detail("domain", domain.label())
            .into());
        }
        (_, None) => {}
    }

    Ok(builder.finish())
}
