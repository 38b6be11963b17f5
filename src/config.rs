//! Server configuration via CLI args and environment variables.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use faultline_http::{CorsOrigins, HttpConfig, InvalidCorsOrigin};

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Error registry server and boundary translator for Faultline services.
#[derive(Parser, Debug, Clone)]
#[command(name = "faultline-server", version, about)]
pub struct Config {
    /// Bind address.
    #[arg(long, default_value = "0.0.0.0", env = "FAULTLINE_HOST")]
    pub host: String,

    /// Bind port.
    #[arg(long, default_value_t = 7480, env = "FAULTLINE_PORT")]
    pub port: u16,

    /// CORS allowed origins (comma-separated). Empty for no CORS.
    #[arg(long, env = "FAULTLINE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds (0 = disabled).
    #[arg(long, default_value_t = 30, env = "FAULTLINE_REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Max requests per client IP per window (0 = disabled).
    #[arg(long, default_value_t = 0, env = "FAULTLINE_RATE_LIMIT")]
    pub rate_limit: u64,

    /// Rate limit window in seconds.
    #[arg(long, default_value_t = 60, env = "FAULTLINE_RATE_LIMIT_WINDOW")]
    pub rate_limit_window: u64,

    /// Key rate limiting on X-Forwarded-For. Only enable behind a proxy
    /// that overwrites the header.
    #[arg(long, env = "FAULTLINE_TRUST_FORWARDED_FOR")]
    pub trust_forwarded_for: bool,

    /// Bearer token for API authentication. If set, non-exempt endpoints require it.
    #[arg(long, env = "FAULTLINE_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// Log level (overridden by RUST_LOG).
    #[arg(long, default_value = "info", env = "FAULTLINE_LOG_LEVEL")]
    pub log_level: String,

    /// Log format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "FAULTLINE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Config {
    /// Parses configuration from CLI args and env vars.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// HTTP-layer subset of the configuration. Fails on a malformed CORS
    /// origin.
    pub fn http_config(&self) -> Result<HttpConfig, InvalidCorsOrigin> {
        Ok(HttpConfig {
            cors_origins: CorsOrigins::parse(&self.cors_origins)?,
            request_timeout: Duration::from_secs(self.request_timeout),
            rate_limit: self.rate_limit,
            rate_limit_window: Duration::from_secs(self.rate_limit_window),
            trust_forwarded_for: self.trust_forwarded_for,
            auth_token: self.auth_token.clone(),
        })
    }
}
