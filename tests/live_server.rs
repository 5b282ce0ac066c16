use host_metrics::api::fake::FakeProbe;
use host_metrics::{routes, Config, MetricsService};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn serves_usage_over_tcp_and_shuts_down() {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    let probe = Arc::new(FakeProbe::new().with_loads([42.0]));
    let service = Arc::new(MetricsService::new(probe, &config));

    let listener = TcpListener::bind(("127.0.0.1", config.port)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(routes::serve(listener, service, async move {
        let _ = stop_rx.await;
    }));

    let body: Value = reqwest::get(format!("http://{}/usage", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["cpu"]["load"], "42.00 %");
    assert_eq!(body["cpu"]["history"][0], "42.00");

    let status = reqwest::get(format!("http://{}/specs", addr))
        .await
        .unwrap()
        .status();
    assert!(status.is_success());

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
