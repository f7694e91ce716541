//! Mode routing
//!
//! - Server mode (HTTP server)
//! - Report mode (one-shot JSON reports printed to stdout)

pub mod report;
pub mod server;

pub use report::{run_forecast_report, run_overview_report};
pub use server::{configure_app, run_server};
