//! The shared service error and its wire body.
//!
//! `ServiceError` is transport-agnostic. Transport crates map it to their
//! own response type, using `status_code()` for the status line and
//! `to_body()` for the payload.

use std::error::Error as StdError;

use http::StatusCode;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::code::ErrorCode;
use crate::details::Details;
use crate::domain::Domain;

/// Details key carrying the upstream name on external-service errors.
pub const SERVICE_NAME_KEY: &str = "service_name";

/// Service error shared across all subsystems.
///
/// Immutable once built. Construct through [`ServiceError::build`] or one
/// of the per-domain shorthands, all of which return a
/// [`ServiceErrorBuilder`] seeded with the domain defaults.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    domain: Domain,
    message: String,
    error_code: ErrorCode,
    details: Details,
    status_code: StatusCode,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

/// Result alias for operations that fail with a [`ServiceError`].
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

impl ServiceError {
    /// Starts an error in `domain`, seeded with the domain's default code
    /// and status.
    pub fn build(domain: Domain, message: impl Into<String>) -> ServiceErrorBuilder {
        let (error_code, status_code) = domain.defaults();
        ServiceErrorBuilder {
            domain,
            message: message.into(),
            error_code,
            status_code,
            details: Details::new(),
            service_name: None,
            source: None,
        }
    }

    /// Generic error: `UNKNOWN_ERROR` / 500 unless overridden.
    pub fn service(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Service, message)
    }

    /// Input validation failure: `VALIDATION_ERROR` / 400.
    pub fn validation(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::service(message)
            .code(ErrorCode::ValidationError)
            .status(StatusCode::BAD_REQUEST)
    }

    /// Quota exhausted: `RATE_LIMIT_EXCEEDED` / 429.
    pub fn rate_limited(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::service(message)
            .code(ErrorCode::RateLimitExceeded)
            .status(StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn chat(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Chat, message)
    }

    /// Errors about individual chat messages (`MESSAGE_NOT_FOUND` / 400).
    pub fn chat_message(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Message, message)
    }

    pub fn user(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::User, message)
    }

    pub fn sandbox(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Sandbox, message)
    }

    pub fn storage(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Storage, message)
    }

    pub fn ai_agent(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::AiAgent, message)
    }

    pub fn scheduler(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Scheduler, message)
    }

    pub fn skill(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Skill, message)
    }

    pub fn command(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Command, message)
    }

    pub fn agent(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Agent, message)
    }

    pub fn api_key(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::ApiKeyValidation, message)
    }

    /// Upstream failure. `service_name` always ends up in
    /// `details["service_name"]`.
    pub fn external_service(
        message: impl Into<String>,
        service_name: impl Into<String>,
    ) -> ServiceErrorBuilder {
        Self::build(Domain::ExternalService, message).service_name(service_name)
    }

    pub fn auth(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Auth, message)
    }

    pub fn marketplace(message: impl Into<String>) -> ServiceErrorBuilder {
        Self::build(Domain::Marketplace, message)
    }

    // --- Accessors ---

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Name of the failed upstream, for external-service errors.
    pub fn service_name(&self) -> Option<&str> {
        self.details.get(SERVICE_NAME_KEY).and_then(Value::as_str)
    }

    /// Canonical wire body. The status code is deliberately absent; it
    /// travels as the transport status.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error_code: self.error_code,
            message: self.message.clone(),
            details: self.details.clone(),
        }
    }

    /// Consumes the error into its wire body.
    pub fn into_body(self) -> ErrorBody {
        ErrorBody {
            error_code: self.error_code,
            message: self.message,
            details: self.details,
        }
    }
}

impl Serialize for ServiceError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ServiceError", 3)?;
        s.serialize_field("error_code", &self.error_code)?;
        s.serialize_field("message", &self.message)?;
        s.serialize_field("details", &self.details)?;
        s.end()
    }
}

/// Builder for a [`ServiceError`], seeded with domain defaults.
///
/// Every field set here takes precedence over the domain default.
#[must_use]
pub struct ServiceErrorBuilder {
    domain: Domain,
    message: String,
    error_code: ErrorCode,
    status_code: StatusCode,
    details: Details,
    service_name: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ServiceErrorBuilder {
    /// Overrides the error code.
    pub fn code(mut self, error_code: ErrorCode) -> Self {
        self.error_code = error_code;
        self
    }

    /// Overrides the transport status.
    ///
    /// Only 4xx and 5xx statuses are accepted. Anything else is ignored with
    /// a warning and the previous status is kept.
    pub fn status(mut self, status_code: StatusCode) -> Self {
        if is_error_status(status_code) {
            self.status_code = status_code;
        } else {
            tracing::warn!(
                error_code = %self.error_code,
                rejected = status_code.as_u16(),
                kept = self.status_code.as_u16(),
                "ignoring non-error status override"
            );
        }
        self
    }

    /// Replaces all details accumulated so far.
    pub fn details(mut self, details: impl Into<Details>) -> Self {
        self.details = details.into();
        self
    }

    /// Adds a single detail entry.
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key, value);
        self
    }

    /// Sets the upstream name, injected into `details["service_name"]`.
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Attaches the underlying cause. Never serialized.
    pub fn source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn finish(self) -> ServiceError {
        let mut details = self.details;
        if let Some(name) = self.service_name {
            details.insert(SERVICE_NAME_KEY, name);
        } else if self.domain == Domain::ExternalService
            && !details.contains_key(SERVICE_NAME_KEY)
        {
            tracing::warn!(
                error_code = %self.error_code,
                "external service error raised without a service name"
            );
            details.insert(SERVICE_NAME_KEY, "unknown");
        }

        ServiceError {
            domain: self.domain,
            message: self.message,
            error_code: self.error_code,
            details,
            status_code: self.status_code,
            source: self.source,
        }
    }
}

impl From<ServiceErrorBuilder> for ServiceError {
    fn from(builder: ServiceErrorBuilder) -> Self {
        builder.finish()
    }
}

/// Wire body of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    /// Stable error code; branch on this, not on the message.
    pub error_code: ErrorCode,
    /// Human-readable description. Wording may change between releases.
    pub message: String,
    /// Structured context, `{}` when there is none.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub details: Details,
}

impl ErrorBody {
    /// Rebuilds the error on the receiving side of the wire, given the
    /// transport status it arrived with. A status outside 4xx/5xx is
    /// replaced by 500.
    pub fn into_error(self, status_code: StatusCode) -> ServiceError {
        let status_code = if is_error_status(status_code) {
            status_code
        } else {
            tracing::warn!(
                error_code = %self.error_code,
                received = status_code.as_u16(),
                "error body arrived with a non-error status, using 500"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        };
        ServiceError {
            domain: self.error_code.domain(),
            message: self.message,
            error_code: self.error_code,
            details: self.details,
            status_code,
            source: None,
        }
    }
}

fn is_error_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

impl From<ServiceError> for ErrorBody {
    fn from(err: ServiceError) -> Self {
        err.into_body()
    }
}
