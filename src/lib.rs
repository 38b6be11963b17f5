//! Faultline Server - error registry server with the shared HTTP error boundary.
//!
//! The taxonomy lives in `faultline-taxonomy` and the translator in
//! `faultline-http`; this crate adds configuration and the process entry
//! point.

pub mod config;

pub use faultline_http::{AppState, HttpConfig, router};
