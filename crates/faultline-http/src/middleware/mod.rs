//! HTTP middleware: request IDs, timeouts, rate limiting, authentication.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod timeout;
