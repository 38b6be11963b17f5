//! Faultline Server entry point.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use faultline_http::InvalidCorsOrigin;
use faultline_server::AppState;
use faultline_server::config::{Config, LogFormat};
use faultline_taxonomy::{Domain, ErrorCode};

/// Failures that stop the server before or while serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid host {host:?}: {source}")]
    InvalidHost {
        host: String,
        source: AddrParseError,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error(transparent)]
    InvalidCorsOrigin(#[from] InvalidCorsOrigin),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() {
    let config = Config::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Faultline Server failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    let state = AppState::new(&config.http_config()?);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        error_codes = ErrorCode::ALL.len(),
        domains = Domain::ALL.len(),
        auth = state.auth().is_some(),
        rate_limit = config.rate_limit,
        "Faultline Server starting",
    );

    let app = faultline_server::router(state.clone());

    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|source| StartupError::InvalidHost {
            host: config.host.clone(),
            source,
        })?;
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    // Spawn rate-limiter cleanup task
    if state.rate_limiter().is_enabled() {
        let cleanup_state = state.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                let removed = cleanup_state.cleanup_rate_limits();
                if removed > 0 {
                    tracing::debug!(removed, "Cleaned up expired rate-limit windows");
                }
            }
        });
    }

    tracing::info!(%addr, "Faultline Server ready");

    faultline_http::serve(listener, app, shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Faultline Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
