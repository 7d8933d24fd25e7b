//! Service configuration — constants plus environment-derived settings.

use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Concilium";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bind address used when `CONCILIUM_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// Chat-completions endpoint used when `CONCILIUM_MODEL_BASE_URL` is unset.
pub const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";

/// Model identifier used when `CONCILIUM_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Per-call model timeout used when `CONCILIUM_MODEL_TIMEOUT_SECS` is unset.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

/// Tracing filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info,concilium=debug".to_string()
}

/// Address the API server binds to.
pub fn bind_addr() -> SocketAddr {
    std::env::var("CONCILIUM_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| DEFAULT_ADDR.parse().expect("default address is valid"))
}

/// Base URL of the chat-completions API.
pub fn model_base_url() -> String {
    std::env::var("CONCILIUM_MODEL_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_MODEL_BASE_URL.to_string())
}

/// Bearer key for the model API. Empty when unconfigured.
pub fn model_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

/// Model identifier sent with every completion request.
pub fn model_name() -> String {
    std::env::var("CONCILIUM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
}

/// Per-call timeout for model requests, in seconds.
pub fn model_timeout_secs() -> u64 {
    std::env::var("CONCILIUM_MODEL_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS)
}
