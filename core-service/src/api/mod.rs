//! API Module
//!
//! Commands the dashboard UI calls. Each takes the `AppContext` built at
//! startup.
//!
//! Structure:
//! - dashboard.rs: session data, uploads, explanations
//! - wake_up.rs: keep-alive controls and backend status

pub mod dashboard;
pub mod wake_up;

pub use dashboard::DashboardView;
pub use wake_up::BackendStatus;
