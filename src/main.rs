use host_metrics::{routes, Config, MetricsService, SysinfoProbe};
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting host metrics server");

    let config = Config::default();
    let service = Arc::new(MetricsService::new(Arc::new(SysinfoProbe::new()), &config));

    let listener = TcpListener::bind(config.listen_addr()).await?;
    routes::serve(listener, service, shutdown_signal()).await?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
