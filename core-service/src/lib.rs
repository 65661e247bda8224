//! FraudLens Core
//!
//! Session and data-source orchestration for the FraudLens dashboard:
//! mock vs real analytics, the analysis backend proxy and its keep-alive.

pub mod api;
pub mod constants;
pub mod context;
pub mod logic;

pub use context::AppContext;
pub use logic::config::ServiceConfig;
