use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::models::response::ErrorBody;
use crate::services::metrics_service::MetricsService;

pub const SPECS_ERROR: &str = "Failed to fetch system specs";
pub const USAGE_ERROR: &str = "Failed to fetch system usage";

pub type SharedService = Arc<MetricsService>;

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/specs", get(specs))
        .route("/usage", get(usage))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve<S>(listener: TcpListener, service: SharedService, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Server running on http://localhost:{}", addr.port());
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Server on {} stopped", addr);
    Ok(())
}

fn failure(message: &'static str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error: message }),
    )
        .into_response()
}

async fn specs(State(service): State<SharedService>) -> Response {
    match service.specs().await {
        Ok(specs) => Json(specs).into_response(),
        Err(e) => {
            error!("{}: {}", SPECS_ERROR, e);
            failure(SPECS_ERROR)
        }
    }
}

async fn usage(State(service): State<SharedService>) -> Response {
    match service.usage().await {
        Ok(usage) => Json(usage).into_response(),
        Err(e) => {
            error!("{}: {}", USAGE_ERROR, e);
            failure(USAGE_ERROR)
        }
    }
}
