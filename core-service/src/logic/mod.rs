//! Logic Module - Services & Data Model
//!
//! ## Structure
//! - `analysis/` - Dashboard data model, mock generator, explanation helpers
//! - `session/` - Mock vs real data selection and persistence
//! - `backend/` - Analysis backend proxy (FastAPI)
//! - `wakeup/` - Backend keep-alive loop
//! - `config` - Runtime configuration

pub mod analysis;
pub mod backend;
pub mod config;
pub mod session;
pub mod wakeup;
