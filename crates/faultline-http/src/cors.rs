//! CORS origin parsing and the CORS layer.
//!
//! Origins are parsed once, before the server binds, so a malformed origin
//! stops startup instead of being dropped at request time.

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::request_id::X_REQUEST_ID;

/// Allowed cross-origin callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsOrigins {
    /// No CORS headers; cross-origin requests are denied.
    #[default]
    Deny,
    /// Wildcard `*`.
    Any,
    /// Exact origins.
    List(Vec<HeaderValue>),
}

/// A configured origin that is not a valid header value.
#[derive(Debug, thiserror::Error)]
#[error("invalid CORS origin {origin:?}")]
pub struct InvalidCorsOrigin {
    pub origin: String,
    #[source]
    source: InvalidHeaderValue,
}

impl CorsOrigins {
    /// Parses configured origins. Empty means [`CorsOrigins::Deny`]; a lone
    /// `*` means [`CorsOrigins::Any`].
    pub fn parse<S: AsRef<str>>(origins: &[S]) -> Result<Self, InvalidCorsOrigin> {
        match origins {
            [] => Ok(Self::Deny),
            [only] if only.as_ref() == "*" => Ok(Self::Any),
            _ => origins
                .iter()
                .map(|o| {
                    let origin = o.as_ref().trim();
                    HeaderValue::from_str(origin).map_err(|source| InvalidCorsOrigin {
                        origin: origin.to_owned(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
        }
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

pub(crate) fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let base = || {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, X_REQUEST_ID.clone()])
            .expose_headers([X_REQUEST_ID.clone()])
    };

    match origins {
        CorsOrigins::Deny => CorsLayer::new(),
        CorsOrigins::Any => {
            tracing::warn!("CORS configured with wildcard origin, all cross-origin requests allowed");
            base().allow_origin(Any)
        }
        CorsOrigins::List(list) => base().allow_origin(list.clone()),
    }
}
