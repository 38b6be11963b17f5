//! Failure domains and their default code/status pairs.
//!
//! A domain fixes the "common case" for its failures (a chat error is
//! usually a not-found). Call sites override the code or status for the
//! rarer same-domain failures instead of introducing a new type per code.
//!
//! Not-found style domains default to `400`, not `404`. Existing clients
//! depend on that convention.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::code::ErrorCode;

/// Failure domain an error is raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Domain {
    /// Generic failures with no specific domain.
    Service,
    Chat,
    Message,
    User,
    Sandbox,
    Storage,
    /// The AI agent backend.
    AiAgent,
    Scheduler,
    Skill,
    Command,
    Agent,
    ApiKeyValidation,
    /// An upstream dependency. Errors in this domain always name the service.
    ExternalService,
    Auth,
    Marketplace,
}

impl Domain {
    /// Every domain, in table order.
    pub const ALL: &'static [Domain] = &[
        Self::Service,
        Self::Chat,
        Self::Message,
        Self::User,
        Self::Sandbox,
        Self::Storage,
        Self::AiAgent,
        Self::Scheduler,
        Self::Skill,
        Self::Command,
        Self::Agent,
        Self::ApiKeyValidation,
        Self::ExternalService,
        Self::Auth,
        Self::Marketplace,
    ];

    /// Default `(error_code, status_code)` for errors raised in this domain.
    pub const fn defaults(self) -> (ErrorCode, StatusCode) {
        match self {
            Self::Service => (ErrorCode::UnknownError, StatusCode::INTERNAL_SERVER_ERROR),
            Self::Chat => (ErrorCode::ChatNotFound, StatusCode::BAD_REQUEST),
            Self::Message => (ErrorCode::MessageNotFound, StatusCode::BAD_REQUEST),
            Self::User => (ErrorCode::UserNotFound, StatusCode::BAD_REQUEST),
            Self::Sandbox => (ErrorCode::SandboxOperationFailed, StatusCode::BAD_REQUEST),
            Self::Storage => (ErrorCode::StorageFileNotFound, StatusCode::BAD_REQUEST),
            Self::AiAgent => (ErrorCode::AiServiceError, StatusCode::BAD_REQUEST),
            Self::Scheduler => (ErrorCode::SchedulerTaskNotFound, StatusCode::BAD_REQUEST),
            Self::Skill => (ErrorCode::SkillNotFound, StatusCode::BAD_REQUEST),
            Self::Command => (ErrorCode::CommandNotFound, StatusCode::BAD_REQUEST),
            Self::Agent => (ErrorCode::AgentNotFound, StatusCode::BAD_REQUEST),
            Self::ApiKeyValidation => (ErrorCode::ApiKeyMissing, StatusCode::BAD_REQUEST),
            Self::ExternalService => (
                ErrorCode::ExternalServiceError,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            Self::Auth => (ErrorCode::AuthInvalidToken, StatusCode::UNAUTHORIZED),
            Self::Marketplace => (ErrorCode::MarketplaceFetchFailed, StatusCode::BAD_REQUEST),
        }
    }

    pub const fn default_code(self) -> ErrorCode {
        self.defaults().0
    }

    pub const fn default_status(self) -> StatusCode {
        self.defaults().1
    }

    /// Stable snake_case label, identical to the serde representation.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Chat => "chat",
            Self::Message => "message",
            Self::User => "user",
            Self::Sandbox => "sandbox",
            Self::Storage => "storage",
            Self::AiAgent => "ai_agent",
            Self::Scheduler => "scheduler",
            Self::Skill => "skill",
            Self::Command => "command",
            Self::Agent => "agent",
            Self::ApiKeyValidation => "api_key_validation",
            Self::ExternalService => "external_service",
            Self::Auth => "auth",
            Self::Marketplace => "marketplace",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
