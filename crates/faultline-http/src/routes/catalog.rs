//! Error registry endpoints, for documentation and client code generation.

use axum::extract::{Json, Path};
use faultline_taxonomy::{Domain, ErrorBody, ErrorCode, ServiceError};

use crate::error::ApiError;
use crate::types::{CodeInfo, DomainInfo, ListCodesResponse, ListDomainsResponse};

/// List every registered error code.
#[utoipa::path(
    get,
    path = "/codes",
    responses(
        (status = 200, description = "Full error code registry", body = ListCodesResponse),
    ),
    tag = "Registry"
)]
pub async fn list_codes() -> Json<ListCodesResponse> {
    Json(ListCodesResponse {
        codes: ErrorCode::ALL.iter().copied().map(CodeInfo::from).collect(),
    })
}

/// Look up a single error code.
///
/// The code must match exactly (no case folding).
#[utoipa::path(
    get,
    path = "/codes/{code}",
    params(("code" = String, Path, description = "Error code, e.g. CHAT_NOT_FOUND")),
    responses(
        (status = 200, description = "Registered code", body = CodeInfo),
        (status = 400, description = "Not a registered code", body = ErrorBody),
    ),
    tag = "Registry"
)]
pub async fn get_code(Path(code): Path<String>) -> Result<Json<CodeInfo>, ApiError> {
    let parsed = code.parse::<ErrorCode>().map_err(|e| {
        ServiceError::validation(e.to_string())
            .detail("code", code.as_str())
            .source(e)
    })?;
    Ok(Json(parsed.into()))
}

/// List every failure domain with its default code and status.
#[utoipa::path(
    get,
    path = "/domains",
    responses(
        (status = 200, description = "Domain defaults table", body = ListDomainsResponse),
    ),
    tag = "Registry"
)]
pub async fn list_domains() -> Json<ListDomainsResponse> {
    Json(ListDomainsResponse {
        domains: Domain::ALL.iter().copied().map(DomainInfo::from).collect(),
    })
}
