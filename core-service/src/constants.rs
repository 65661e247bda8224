//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default backend, only edit this file.

/// Default Backend URL
///
/// This is the fallback URL when no environment variable is set.
/// For development: http://127.0.0.1:8000
/// For production: https://npn-kh8l.onrender.com
pub const DEFAULT_BACKEND_URL: &str = "https://npn-kh8l.onrender.com";

/// Key under which the dashboard session is persisted
pub const SESSION_KEY: &str = "fraudlens_dashboard_session";

/// Directory name used below the platform data dir
pub const APP_DIR_NAME: &str = "fraudlens";

/// Default backend request timeout (seconds)
pub const DEFAULT_BACKEND_TIMEOUT: u64 = 30;

/// Default wake-up interval (seconds)
pub const DEFAULT_WAKE_UP_INTERVAL: u64 = 5 * 60;

/// Default per-probe wake-up timeout (seconds)
pub const DEFAULT_WAKE_UP_TIMEOUT: u64 = 10;

/// Default health check timeout (seconds)
pub const DEFAULT_HEALTH_TIMEOUT: u64 = 5;

/// Endpoints probed by the wake-up service, in order
pub const WAKE_UP_ENDPOINTS: [&str; 3] = ["/docs", "/health", "/"];

/// Number of synthetic transactions in a mock dataset
pub const MOCK_RECORD_COUNT: usize = 25;

/// Share of mock transactions marked fraudulent
pub const MOCK_FRAUD_RATE: f64 = 0.15;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "FraudLens";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get backend URL from environment or use default
pub fn get_backend_url() -> String {
    std::env::var("BACKEND_URL")
        .ok()
        .map(|url| url.trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

/// Get backend request timeout from environment or use default
pub fn get_backend_timeout() -> u64 {
    env_u64("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT)
}

/// Get wake-up interval from environment or use default
pub fn get_wake_up_interval() -> u64 {
    env_u64("WAKE_UP_INTERVAL_SECS", DEFAULT_WAKE_UP_INTERVAL)
}

/// Get per-probe wake-up timeout from environment or use default
pub fn get_wake_up_timeout() -> u64 {
    env_u64("WAKE_UP_TIMEOUT_SECS", DEFAULT_WAKE_UP_TIMEOUT)
}

/// Get health check timeout from environment or use default
pub fn get_health_timeout() -> u64 {
    env_u64("HEALTH_TIMEOUT_SECS", DEFAULT_HEALTH_TIMEOUT)
}

/// Check if the keep-alive loop is enabled
pub fn is_wake_up_enabled() -> bool {
    std::env::var("WAKE_UP_ENABLED")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}

/// Get wake-up endpoints from environment (comma separated) or use default
pub fn get_wake_up_endpoints() -> Vec<String> {
    let endpoints: Vec<String> = std::env::var("WAKE_UP_ENDPOINTS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|e| e.starts_with('/'))
        .map(str::to_string)
        .collect();

    if endpoints.is_empty() {
        WAKE_UP_ENDPOINTS.iter().map(|e| e.to_string()).collect()
    } else {
        endpoints
    }
}

/// Get session directory override, if any
pub fn get_session_dir() -> Option<String> {
    std::env::var("SESSION_DIR").ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
