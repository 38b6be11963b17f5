//! Faultline Taxonomy — the error contract shared by every service.
//!
//! Every failure is a [`ServiceError`] carrying a stable [`ErrorCode`], a
//! human-readable message, structured [`Details`] and the transport status
//! to report. Each failure [`Domain`] fixes a default code/status pair that
//! the raise site may override.
//!
//! Transport crates (`faultline-http`) depend on this crate and translate
//! errors into wire responses.
//!
//! **Zero transport dependencies** — no axum, no server code. `http` is used
//! for its `StatusCode` type only.
//!
//! ```
//! use faultline_taxonomy::{ErrorCode, ServiceError, StatusCode};
//!
//! let err: ServiceError = ServiceError::chat("daily limit hit")
//!     .code(ErrorCode::ChatDailyLimitExceeded)
//!     .status(StatusCode::TOO_MANY_REQUESTS)
//!     .detail("limit", 50)
//!     .into();
//!
//! assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
//! assert_eq!(err.to_body().error_code.as_str(), "CHAT_DAILY_LIMIT_EXCEEDED");
//! ```

pub mod code;
pub mod details;
pub mod domain;
pub mod error;

pub use code::{ErrorCode, UnknownErrorCode};
pub use details::Details;
pub use domain::Domain;
pub use error::{ErrorBody, Result, SERVICE_NAME_KEY, ServiceError, ServiceErrorBuilder};

pub use http::StatusCode;
