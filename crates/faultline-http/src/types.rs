//! Request/response types for the Faultline HTTP API.

use faultline_taxonomy::{Details, Domain, ErrorCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Server status ("ok").
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Number of registered error codes.
    pub error_codes: usize,
}

/// One entry of the error code registry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CodeInfo {
    pub code: ErrorCode,
    /// Domain the code belongs to by prefix.
    pub domain: Domain,
}

impl From<ErrorCode> for CodeInfo {
    fn from(code: ErrorCode) -> Self {
        Self {
            code,
            domain: code.domain(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ListCodesResponse {
    pub codes: Vec<CodeInfo>,
}

/// Default code/status pair of a failure domain.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainInfo {
    pub domain: Domain,
    pub default_code: ErrorCode,
    pub default_status: u16,
}

impl From<Domain> for DomainInfo {
    fn from(domain: Domain) -> Self {
        let (default_code, default_status) = domain.defaults();
        Self {
            domain,
            default_code,
            default_status: default_status.as_u16(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ListDomainsResponse {
    pub domains: Vec<DomainInfo>,
}

/// Error to construct and return through the boundary translator.
///
/// Every optional field falls back to the domain default.
#[derive(Deserialize, ToSchema)]
pub struct RaiseRequest {
    /// Failure domain (e.g. "chat", "external_service").
    pub domain: Domain,
    /// Human-readable message.
    pub message: String,
    /// Override for the domain's default code.
    #[serde(default)]
    pub error_code: Option<ErrorCode>,
    /// Override for the domain's default status (400..=599).
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Structured context.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Details>,
    /// Upstream name. Required for the `external_service` domain and
    /// rejected for every other domain.
    #[serde(default)]
    pub service_name: Option<String>,
}
