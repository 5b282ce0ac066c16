pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::sysinfo_probe::SysinfoProbe;
pub use config::Config;
pub use error::{MetricsError, MetricsResult};
pub use services::metrics_service::MetricsService;
