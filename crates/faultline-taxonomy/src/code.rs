//! The error code registry.
//!
//! `ErrorCode` is the wire contract clients branch on. The set is closed:
//! a new failure kind means a new variant here, never an ad-hoc string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// Machine-readable, stable error code.
///
/// Each variant serializes to its `SCREAMING_SNAKE_CASE` name, which is
/// exactly what [`ErrorCode::as_str`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ErrorCode {
    /// Unclassified failure.
    UnknownError,

    // -- Chat --
    ChatNotFound,
    ChatAccessDenied,
    ChatDailyLimitExceeded,

    // -- Message --
    MessageNotFound,

    // -- User --
    UserNotFound,

    // -- Auth --
    AuthInvalidToken,

    // -- Sandbox --
    SandboxCreateFailed,
    SandboxOperationFailed,

    // -- Storage --
    StorageFileNotFound,

    // -- AI agent --
    AiServiceError,

    // -- API keys --
    ApiKeyMissing,

    // -- Scheduler --
    SchedulerTaskNotFound,

    // -- Skill / command / agent --
    SkillNotFound,
    CommandNotFound,
    AgentNotFound,

    // -- Marketplace --
    MarketplaceFetchFailed,
    MarketplacePluginNotFound,
    MarketplaceInstallFailed,

    // -- Generic --
    /// Request input failed validation.
    ValidationError,
    /// Caller exceeded a request quota.
    RateLimitExceeded,
    /// An upstream dependency failed.
    ExternalServiceError,
}

impl ErrorCode {
    /// Every registered code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        Self::UnknownError,
        Self::ChatNotFound,
        Self::ChatAccessDenied,
        Self::ChatDailyLimitExceeded,
        Self::MessageNotFound,
        Self::UserNotFound,
        Self::AuthInvalidToken,
        Self::SandboxCreateFailed,
        Self::SandboxOperationFailed,
        Self::StorageFileNotFound,
        Self::AiServiceError,
        Self::ApiKeyMissing,
        Self::SchedulerTaskNotFound,
        Self::SkillNotFound,
        Self::CommandNotFound,
        Self::AgentNotFound,
        Self::MarketplaceFetchFailed,
        Self::MarketplacePluginNotFound,
        Self::MarketplaceInstallFailed,
        Self::ValidationError,
        Self::RateLimitExceeded,
        Self::ExternalServiceError,
    ];

    /// Stable wire representation (e.g. `"CHAT_NOT_FOUND"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::ChatNotFound => "CHAT_NOT_FOUND",
            Self::ChatAccessDenied => "CHAT_ACCESS_DENIED",
            Self::ChatDailyLimitExceeded => "CHAT_DAILY_LIMIT_EXCEEDED",
            Self::MessageNotFound => "MESSAGE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AuthInvalidToken => "AUTH_INVALID_TOKEN",
            Self::SandboxCreateFailed => "SANDBOX_CREATE_FAILED",
            Self::SandboxOperationFailed => "SANDBOX_OPERATION_FAILED",
            Self::StorageFileNotFound => "STORAGE_FILE_NOT_FOUND",
            Self::AiServiceError => "AI_SERVICE_ERROR",
            Self::ApiKeyMissing => "API_KEY_MISSING",
            Self::SchedulerTaskNotFound => "SCHEDULER_TASK_NOT_FOUND",
            Self::SkillNotFound => "SKILL_NOT_FOUND",
            Self::CommandNotFound => "COMMAND_NOT_FOUND",
            Self::AgentNotFound => "AGENT_NOT_FOUND",
            Self::MarketplaceFetchFailed => "MARKETPLACE_FETCH_FAILED",
            Self::MarketplacePluginNotFound => "MARKETPLACE_PLUGIN_NOT_FOUND",
            Self::MarketplaceInstallFailed => "MARKETPLACE_INSTALL_FAILED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
        }
    }

    /// The failure domain this code belongs to, by prefix.
    ///
    /// Codes without a domain prefix belong to [`Domain::Service`].
    pub const fn domain(self) -> Domain {
        match self {
            Self::UnknownError | Self::ValidationError | Self::RateLimitExceeded => {
                Domain::Service
            }
            Self::ChatNotFound | Self::ChatAccessDenied | Self::ChatDailyLimitExceeded => {
                Domain::Chat
            }
            Self::MessageNotFound => Domain::Message,
            Self::UserNotFound => Domain::User,
            Self::AuthInvalidToken => Domain::Auth,
            Self::SandboxCreateFailed | Self::SandboxOperationFailed => Domain::Sandbox,
            Self::StorageFileNotFound => Domain::Storage,
            Self::AiServiceError => Domain::AiAgent,
            Self::ApiKeyMissing => Domain::ApiKeyValidation,
            Self::SchedulerTaskNotFound => Domain::Scheduler,
            Self::SkillNotFound => Domain::Skill,
            Self::CommandNotFound => Domain::Command,
            Self::AgentNotFound => Domain::Agent,
            Self::MarketplaceFetchFailed
            | Self::MarketplacePluginNotFound
            | Self::MarketplaceInstallFailed => Domain::Marketplace,
            Self::ExternalServiceError => Domain::ExternalService,
        }
    }

    /// Returns `true` if `s` is the exact wire string of a registered code.
    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not a registered [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code: {0:?}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_owned()))
    }
}

impl TryFrom<&str> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
