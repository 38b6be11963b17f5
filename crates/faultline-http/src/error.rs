//! Boundary translation from errors to HTTP responses.
//!
//! Handlers and middleware return `Result<_, ApiError>`. A [`ServiceError`]
//! keeps its own status and body. Anything else is unclassified and becomes
//! `500` with `UNKNOWN_ERROR`; this is the only place that fallback happens.

use std::any::Any;
use std::error::Error as StdError;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use faultline_taxonomy::{Details, ErrorBody, ErrorCode, ServiceError, ServiceErrorBuilder};

/// Message sent to clients for unclassified failures. The real cause is
/// logged, never echoed.
pub const UNCLASSIFIED_MESSAGE: &str = "internal server error";

/// Any error that can reach the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A classified failure from the taxonomy.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Anything that is not a `ServiceError`.
    #[error("unclassified error: {0}")]
    Unclassified(String),
}

impl ApiError {
    /// Wraps an arbitrary error, keeping it classified if it is a
    /// `ServiceError` underneath.
    pub fn from_error(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match err.downcast::<ServiceError>() {
            Ok(service) => Self::Service(*service),
            Err(other) => Self::Unclassified(other.to_string()),
        }
    }

    /// Wraps a failure known to be outside the taxonomy.
    pub fn unclassified(err: impl std::fmt::Display) -> Self {
        Self::Unclassified(err.to_string())
    }

    /// Status line this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(err) => err.status_code(),
            Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body this error is reported with.
    pub fn to_body(&self) -> ErrorBody {
        match self {
            Self::Service(err) => err.to_body(),
            Self::Unclassified(_) => unclassified_body(),
        }
    }
}

fn unclassified_body() -> ErrorBody {
    ErrorBody {
        error_code: ErrorCode::UnknownError,
        message: UNCLASSIFIED_MESSAGE.to_owned(),
        details: Details::new(),
    }
}

impl From<ServiceErrorBuilder> for ApiError {
    fn from(builder: ServiceErrorBuilder) -> Self {
        Self::Service(builder.finish())
    }
}

/// Malformed or mistyped JSON bodies are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::validation("invalid request body")
            .detail("reason", rejection.body_text())
            .into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Service(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    tracing::error!(
                        error_code = %err.error_code(),
                        status = status.as_u16(),
                        domain = %err.domain(),
                        source = ?StdError::source(&err).map(ToString::to_string),
                        "{}",
                        err.message(),
                    );
                } else {
                    tracing::debug!(
                        error_code = %err.error_code(),
                        status = status.as_u16(),
                        domain = %err.domain(),
                        "{}",
                        err.message(),
                    );
                }
                (status, err.into_body())
            }
            ApiError::Unclassified(msg) => {
                tracing::error!(%msg, "unclassified error reached the boundary");
                (StatusCode::INTERNAL_SERVER_ERROR, unclassified_body())
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Response for a handler that panicked. Used with `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let msg = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "handler panicked".to_owned()
    };
    ApiError::Unclassified(format!("panic: {msg}")).into_response()
}
