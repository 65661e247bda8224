//! Backend errors

use thiserror::Error;

/// Everything that can go wrong talking to the analysis backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Last health check failed, request not attempted
    #[error("Backend is not available. Please ensure the FastAPI server is running.")]
    Unavailable,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response
    #[error("Backend API error: {status}{}", format_body(.body))]
    Server { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// 2xx response whose body lacks what the endpoint promises
    #[error("Invalid response format from {0} endpoint")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if err.is_builder() {
            Self::Client(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
