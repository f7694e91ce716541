//! Service layer for business logic
//!
//! Shared by the HTTP API and the one-shot CLI report commands.

mod dashboard_service;
mod record_service;

pub use dashboard_service::*;
pub use record_service::*;
