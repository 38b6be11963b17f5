//! Faultline HTTP — boundary translator and error-registry API.
//!
//! Provides:
//! - `ApiError`, the `IntoResponse` translator for taxonomy errors, with the
//!   `500 UNKNOWN_ERROR` fallback for everything else
//! - [`boundary`], the layer stack any service router can wrap itself in
//!   (panic catching, request timeout, request IDs, tracing)
//! - Registry endpoints (codes, domains, error preview)
//! - Rate limiting and bearer-auth middleware that fail with taxonomy errors
//! - OpenAPI/Swagger UI

pub mod auth;
pub mod cors;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod types;

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use faultline_taxonomy::{Domain, ErrorBody, ErrorCode};

pub use cors::{CorsOrigins, InvalidCorsOrigin};
pub use error::ApiError;
pub use state::{AppState, HttpConfig};

// ---------------------------------------------------------------------------
// OpenAPI
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Faultline API",
        description = "Error code registry and boundary translator.\n\nEvery error response has the body `{error_code, message, details}`; the HTTP status travels on the status line only. Clients should branch on `error_code`.",
        license(name = "Apache-2.0"),
    ),
    paths(
        routes::system::health,
        routes::catalog::list_codes,
        routes::catalog::get_code,
        routes::catalog::list_domains,
        routes::raise::raise,
    ),
    components(
        schemas(
            ErrorBody, ErrorCode, Domain,
            types::HealthResponse, types::CodeInfo, types::ListCodesResponse,
            types::DomainInfo, types::ListDomainsResponse, types::RaiseRequest,
        )
    ),
    tags(
        (name = "Registry", description = "Error codes, domain defaults, and error previews"),
        (name = "System", description = "System and health endpoints"),
    )
)]
struct ApiDoc;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Builds the HTTP API router.
///
/// Call this from the binary crate to get a fully-wired axum `Router`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Registry
        .route("/codes", get(routes::catalog::list_codes))
        .route("/codes/{code}", get(routes::catalog::get_code))
        .route("/domains", get(routes::catalog::list_domains))
        .route("/errors/raise", post(routes::raise::raise))
        // System
        .route("/health", get(routes::system::health))
        .fallback(routes::not_found)
        .layer(CompressionLayer::new());

    let api = api
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ))
        .layer(cors::cors_layer(state.cors_origins()))
        .with_state(state.clone());

    let app = api.merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()));

    boundary(app, state.request_timeout())
}

/// Wraps a router in the error boundary.
///
/// Innermost first: request timeout (→ `504 UNKNOWN_ERROR`), panic catching
/// (→ `500 UNKNOWN_ERROR`), HTTP tracing, request-ID propagation. Any
/// service router can use this to get the same wire contract.
pub fn boundary(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(axum::middleware::from_fn_with_state(
            request_timeout,
            middleware::timeout::timeout_middleware,
        ))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            middleware::request_id::request_id_middleware,
        ))
}

/// Serve the HTTP router on the given listener with graceful shutdown.
///
/// Wraps `axum::serve` with `ConnectInfo<SocketAddr>` so rate limiting
/// can extract client addresses.
pub async fn serve(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
