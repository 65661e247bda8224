//! Wake-Up Module - Backend Keep-Alive
//!
//! The backend runs on a host that suspends idle instances. This module pings
//! it in the background so the first real request does not hit a cold start.
//!
//! ## Liveness
//! ```text
//! Unknown --> Waking --> Alive
//!                   \--> Dead
//! ```
//! Re-entered on every timer tick or manual call. Failures of other backend
//! requests never move this state.


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::logic::backend::{BackendClient, BackendError};
use crate::logic::config::ServiceConfig;

/// Shortest accepted keep-alive interval
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// What the keep-alive loop last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    /// No probe finished yet
    Unknown,
    /// Probe cycle in flight
    Waking,
    /// Last cycle got a 2xx
    Alive,
    /// Last cycle failed on every endpoint
    Dead,
}

impl Liveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Liveness::Unknown => "unknown",
            Liveness::Waking => "waking",
            Liveness::Alive => "alive",
            Liveness::Dead => "dead",
        }
    }
}

impl std::fmt::Display for Liveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Releases the wake-up flag on every exit path, cancellation included
struct WakeGuard<'a>(&'a AtomicBool);

impl Drop for WakeGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Periodic backend keep-alive
pub struct WakeUpService {
    client: BackendClient,
    endpoints: Vec<String>,
    interval: Duration,
    probe_timeout: Duration,
    health_timeout: Duration,
    is_waking_up: AtomicBool,
    liveness: RwLock<Liveness>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl WakeUpService {
    pub fn new(config: &ServiceConfig) -> Result<Self, BackendError> {
        Ok(Self::with_client(BackendClient::new(config)?, config))
    }

    pub fn with_client(client: BackendClient, config: &ServiceConfig) -> Self {
        Self {
            client,
            endpoints: config.wake_up_endpoints.clone(),
            interval: config.wake_up_interval().max(MIN_INTERVAL),
            probe_timeout: config.wake_up_timeout(),
            health_timeout: config.health_timeout(),
            is_waking_up: AtomicBool::new(false),
            liveness: RwLock::new(Liveness::Unknown),
            ticker: Mutex::new(None),
        }
    }

    /// Override the keep-alive interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Override the per-probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn backend_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn liveness(&self) -> Liveness {
        *self.liveness.read()
    }

    pub fn is_waking_up(&self) -> bool {
        self.is_waking_up.load(Ordering::Acquire)
    }

    fn set_liveness(&self, state: Liveness) {
        *self.liveness.write() = state;
    }

    /// Probe the wake-up endpoints in order until one answers 2xx.
    ///
    /// Returns `false` right away if another wake-up is in flight, and after
    /// every endpoint has failed.
    pub async fn wake_up_backend(&self) -> bool {
        if self
            .is_waking_up
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Wake-up already in progress");
            return false;
        }
        let _guard = WakeGuard(&self.is_waking_up);

        self.set_liveness(Liveness::Waking);

        for endpoint in &self.endpoints {
            match self.client.probe(endpoint, self.probe_timeout).await {
                Ok(status) if status.is_success() => {
                    log::info!("Backend woken up via {}", endpoint);
                    self.set_liveness(Liveness::Alive);
                    return true;
                }
                Ok(status) => {
                    log::warn!("Failed to wake up backend via {}: HTTP {}", endpoint, status.as_u16());
                }
                Err(e) => {
                    log::warn!("Failed to wake up backend via {}: {}", endpoint, e);
                }
            }
        }

        log::error!("Failed to wake up backend via any endpoint");
        self.set_liveness(Liveness::Dead);
        false
    }

    /// Single `/health` probe with the short health timeout
    pub async fn check_backend_health(&self) -> bool {
        match self.client.health_check(Some(self.health_timeout)).await {
            Ok(()) => {
                self.set_liveness(Liveness::Alive);
                true
            }
            Err(e) => {
                log::warn!("Backend health check failed: {}", e);
                self.set_liveness(Liveness::Dead);
                false
            }
        }
    }

    /// Start the keep-alive timer. Wakes the backend immediately, then once
    /// per interval. No-op if already running. Needs a tokio runtime.
    pub fn start_periodic_wake_up(self: &Arc<Self>) {
        self.spawn_ticker(Instant::now());
    }

    /// Wake the backend once, then start the timer with its first tick one
    /// interval from now
    pub async fn initialize(self: &Arc<Self>) -> bool {
        log::info!("Initializing backend wake-up service for {}", self.backend_url());
        let awake = self.wake_up_backend().await;
        self.spawn_ticker(Instant::now() + self.interval);
        awake
    }

    /// Stop the keep-alive timer. No-op if not running.
    pub fn stop_periodic_wake_up(&self) {
        if let Some(handle) = self.ticker.lock().take() {
            handle.abort();
            log::info!("Stopped periodic backend wake-up service");
        }
    }

    pub fn is_periodic_running(&self) -> bool {
        self.ticker
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn spawn_ticker(self: &Arc<Self>, first_tick: Instant) {
        let mut ticker = self.ticker.lock();
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        log::info!("Starting periodic backend wake-up service (every {:?})", self.interval);

        // Weak so the timer never keeps the service alive on its own
        let service = Arc::downgrade(self);
        let period = self.interval;

        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(service) = service.upgrade() else {
                    break;
                };
                service.wake_up_backend().await;
            }
        }));
    }
}

impl Drop for WakeUpService {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().take() {
            handle.abort();
        }
    }
}
