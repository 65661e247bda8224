//! Service configuration
//!
//! Collected once at startup from the environment (see `constants`).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Runtime configuration shared by the backend, wake-up and session services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Backend base URL, without trailing slash
    pub backend_url: String,
    /// Default timeout for backend API calls in seconds
    pub backend_timeout_secs: u64,
    /// Keep-alive interval in seconds
    pub wake_up_interval_secs: u64,
    /// Timeout for each keep-alive probe in seconds
    pub wake_up_timeout_secs: u64,
    /// Timeout for the lightweight health check in seconds
    pub health_timeout_secs: u64,
    /// Endpoints probed by the keep-alive loop, in order
    pub wake_up_endpoints: Vec<String>,
    /// Enable the periodic keep-alive loop
    pub wake_up_enabled: bool,
    /// Directory holding the persisted session
    pub session_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend_url: constants::DEFAULT_BACKEND_URL.to_string(),
            backend_timeout_secs: constants::DEFAULT_BACKEND_TIMEOUT,
            wake_up_interval_secs: constants::DEFAULT_WAKE_UP_INTERVAL,
            wake_up_timeout_secs: constants::DEFAULT_WAKE_UP_TIMEOUT,
            health_timeout_secs: constants::DEFAULT_HEALTH_TIMEOUT,
            wake_up_endpoints: constants::WAKE_UP_ENDPOINTS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            wake_up_enabled: true,
            session_dir: default_session_dir(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            backend_url: constants::get_backend_url(),
            backend_timeout_secs: constants::get_backend_timeout(),
            wake_up_interval_secs: constants::get_wake_up_interval(),
            wake_up_timeout_secs: constants::get_wake_up_timeout(),
            health_timeout_secs: constants::get_health_timeout(),
            wake_up_endpoints: constants::get_wake_up_endpoints(),
            wake_up_enabled: constants::is_wake_up_enabled(),
            session_dir: constants::get_session_dir()
                .map(PathBuf::from)
                .unwrap_or_else(default_session_dir),
        }
    }

    /// Config pointing at a specific backend, everything else default
    pub fn for_backend(url: impl Into<String>) -> Self {
        Self {
            backend_url: url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn wake_up_interval(&self) -> Duration {
        Duration::from_secs(self.wake_up_interval_secs)
    }

    pub fn wake_up_timeout(&self) -> Duration {
        Duration::from_secs(self.wake_up_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    /// Full path of the session file
    pub fn session_path(&self) -> PathBuf {
        self.session_dir
            .join(format!("{}.json", constants::SESSION_KEY))
    }
}

/// Platform local data dir, falling back to the working directory
pub fn default_session_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::APP_DIR_NAME)
}
