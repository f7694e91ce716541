pub mod admin;
pub mod dashboard;
pub mod health;

pub use dashboard::{DashboardApi, dashboard_routes};
pub use health::{AppStartTime, HealthService, health_routes};
