//! Application Context
//!
//! Owns the three services the dashboard talks to. Built once at startup and
//! passed by reference to the command layer.

use std::sync::Arc;

use crate::logic::backend::{BackendClient, BackendError, BackendService};
use crate::logic::config::ServiceConfig;
use crate::logic::session::{SessionService, SessionStore};
use crate::logic::wakeup::WakeUpService;

pub struct AppContext {
    config: ServiceConfig,
    session: SessionService,
    backend: BackendService,
    wake_up: Arc<WakeUpService>,
}

impl AppContext {
    /// Build the context with the session persisted under `config.session_dir`
    pub fn new(config: ServiceConfig) -> Result<Self, BackendError> {
        let session = SessionService::open(&config);
        Self::build(config, session)
    }

    /// Build the context on top of a caller-provided session store
    pub fn with_store(config: ServiceConfig, store: impl SessionStore + 'static) -> Result<Self, BackendError> {
        let session = SessionService::new(Box::new(store));
        Self::build(config, session)
    }

    fn build(config: ServiceConfig, session: SessionService) -> Result<Self, BackendError> {
        // One connection pool for the proxy and the keep-alive probes
        let client = BackendClient::new(&config)?;
        let backend = BackendService::with_client(client.clone());
        let wake_up = Arc::new(WakeUpService::with_client(client, &config));

        Ok(Self {
            config,
            session,
            backend,
            wake_up,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn backend(&self) -> &BackendService {
        &self.backend
    }

    pub fn wake_up(&self) -> &Arc<WakeUpService> {
        &self.wake_up
    }

    /// Wake the backend and start the keep-alive timer (unless disabled),
    /// then run the proxy's health check. Returns backend availability.
    pub async fn start(&self) -> bool {
        if self.config.wake_up_enabled {
            self.wake_up.initialize().await;
        } else {
            log::info!("Backend wake-up disabled by configuration");
        }

        self.backend.check_backend_health().await
    }

    /// Stop background work
    pub fn shutdown(&self) {
        self.wake_up.stop_periodic_wake_up();
        log::info!("FraudLens core stopped");
    }
}
