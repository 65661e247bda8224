//! Wake-Up API Commands
//!
//! Manual keep-alive controls and the backend status indicator.

use serde::Serialize;

use crate::context::AppContext;
use crate::logic::wakeup::Liveness;

/// Backend status for the status indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendStatus {
    pub backend_url: String,
    /// Proxy availability flag
    pub is_available: bool,
    /// `None` until the first probe finished
    pub is_backend_alive: Option<bool>,
    pub liveness: Liveness,
    pub is_waking_up: bool,
    pub periodic_running: bool,
}

/// Wake the backend now. A successful wake-up also refreshes the proxy's
/// availability flag.
pub async fn manual_wake_up(ctx: &AppContext) -> bool {
    let awake = ctx.wake_up().wake_up_backend().await;
    if awake {
        ctx.backend().check_backend_health().await;
    }
    awake
}

/// Probe `/health` once
pub async fn check_health(ctx: &AppContext) -> bool {
    ctx.wake_up().check_backend_health().await
}

/// Get backend status
pub fn backend_status(ctx: &AppContext) -> BackendStatus {
    let wake_up = ctx.wake_up();
    let liveness = wake_up.liveness();

    BackendStatus {
        backend_url: wake_up.backend_url().to_string(),
        is_available: ctx.backend().is_available(),
        is_backend_alive: match liveness {
            Liveness::Alive => Some(true),
            Liveness::Dead => Some(false),
            Liveness::Unknown | Liveness::Waking => None,
        },
        liveness,
        is_waking_up: wake_up.is_waking_up(),
        periodic_running: wake_up.is_periodic_running(),
    }
}
