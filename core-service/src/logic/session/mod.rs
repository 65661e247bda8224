//! Session Module - Mock vs Real Dashboard Data
//!
//! Decides whether the dashboard shows generated mock analytics or the
//! results of the last real upload, and persists that decision.
//!
//! Persistence failures never reach the caller: they are logged and the
//! session keeps working in memory.

pub mod storage;

#[cfg(test)]
mod tests;

pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, StorageError};

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::analysis::{generate_mock_analysis, AnalysisResult, DataSource, SessionInfo};
use crate::logic::config::ServiceConfig;

/// Persisted session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default)]
    pub has_uploaded_data: bool,
    /// Regenerated on load when an older session lacks it
    #[serde(default = "generate_mock_analysis")]
    pub mock_data: AnalysisResult,
    #[serde(default)]
    pub real_data: Option<AnalysisResult>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl SessionData {
    /// New session showing freshly generated mock data
    pub fn fresh() -> Self {
        Self {
            has_uploaded_data: false,
            mock_data: generate_mock_analysis(),
            real_data: None,
            last_updated: Utc::now(),
        }
    }

    /// Real data is shown only when flagged and present
    pub fn is_showing_real_data(&self) -> bool {
        self.has_uploaded_data && self.real_data.is_some()
    }

    /// The dataset the dashboard should render
    pub fn current(&self) -> &AnalysisResult {
        match (&self.real_data, self.has_uploaded_data) {
            (Some(real), true) => real,
            _ => &self.mock_data,
        }
    }

    pub fn info(&self) -> SessionInfo {
        let current = self.current();
        SessionInfo {
            has_uploaded_data: self.has_uploaded_data,
            last_updated: self.last_updated.to_rfc3339_opts(SecondsFormat::Millis, true),
            data_source: if self.is_showing_real_data() {
                DataSource::Real
            } else {
                DataSource::Mock
            },
            total_records: current.total_records,
            fraud_count: current.fraud_count,
        }
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Owner of the dashboard session
pub struct SessionService {
    store: Box<dyn SessionStore>,
    state: RwLock<SessionData>,
}

impl SessionService {
    /// Create the service, restoring any persisted session from `store`
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        let state = load_session(store.as_ref());
        Self {
            store,
            state: RwLock::new(state),
        }
    }

    /// Session persisted in the configured session directory
    pub fn open(config: &ServiceConfig) -> Self {
        Self::new(Box::new(FileSessionStore::new(config.session_path())))
    }

    /// Session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStore::new()))
    }

    /// Current dashboard data (real if uploaded, otherwise mock)
    pub fn get_current_data(&self) -> AnalysisResult {
        self.state.read().current().clone()
    }

    /// Copy of the whole session state
    pub fn snapshot(&self) -> SessionData {
        self.state.read().clone()
    }

    pub fn is_showing_real_data(&self) -> bool {
        self.state.read().is_showing_real_data()
    }

    pub fn get_session_info(&self) -> SessionInfo {
        self.state.read().info()
    }

    /// Switch to real data returned by the backend. Stored as-is.
    pub fn update_with_real_data(&self, data: AnalysisResult) {
        let mut state = self.state.write();
        log::info!(
            "Session switched to real data: {} records, {} flagged",
            data.total_records,
            data.fraud_count
        );
        state.has_uploaded_data = true;
        state.real_data = Some(data);
        state.touch();
        self.persist(&state);
    }

    /// Drop real data and start over with fresh mock data
    pub fn reset_to_mock_data(&self) {
        let mut state = self.state.write();
        state.has_uploaded_data = false;
        state.real_data = None;
        state.mock_data = generate_mock_analysis();
        state.touch();
        log::info!("Session reset to mock data");
        self.persist(&state);
    }

    /// Regenerate mock data, real data is left alone
    pub fn refresh_mock_data(&self) {
        let mut state = self.state.write();
        state.mock_data = generate_mock_analysis();
        state.touch();
        log::debug!("Mock data refreshed");
        self.persist(&state);
    }

    /// Drop the stored session and replace it with a fresh one
    pub fn clear_session(&self) {
        let mut state = self.state.write();
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear session data at {}: {}", self.store.describe(), e);
        }
        *state = SessionData::fresh();
        log::info!("Session cleared");
        self.persist(&state);
    }

    fn persist(&self, state: &SessionData) {
        if let Err(e) = self.store.save(state) {
            log::warn!(
                "Failed to save session data to {}: {} - continuing in memory",
                self.store.describe(),
                e
            );
        }
    }
}

/// Restore a session, falling back to a fresh one on any failure
fn load_session(store: &dyn SessionStore) -> SessionData {
    match store.load() {
        Ok(Some(session)) => {
            log::info!(
                "Session restored from {} ({})",
                store.describe(),
                session.info().data_source
            );
            session
        }
        Ok(None) => {
            log::debug!("No stored session, starting with mock data");
            SessionData::fresh()
        }
        Err(e) => {
            log::warn!("Failed to load session data from {}: {}", store.describe(), e);
            SessionData::fresh()
        }
    }
}
