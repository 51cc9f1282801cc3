//! Round-trip tests against an in-process mock of the simulation backend.

use std::net::TcpListener;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tokio::sync::oneshot;

use qoswatch_client::{ClientError, SimulatorClient};
use qoswatch_types::UserDensity;

async fn get_statistics() -> impl IntoResponse {
    Json(json!({
        "rl":  { "throughput": 42.5, "average_latency": 18.2, "average_packet_loss": 1.4, "fairness_index": 0.91 },
        "rr":  { "throughput": 39.1, "average_latency": 22.7, "average_packet_loss": 2.1, "fairness_index": 0.97 },
        "cqi": { "throughput": 44.0, "average_latency": 16.5, "average_packet_loss": 1.1, "fairness_index": 0.84 }
    }))
}

async fn get_traffic_types() -> impl IntoResponse {
    Json(json!({
        "Voice Call": { "data_rate": 0.5, "latency": 10.0 },
        "YouTube":    { "data_rate": 50.0, "latency": 15.0 }
    }))
}

async fn get_traffic_type_counts() -> impl IntoResponse {
    Json(json!({
        "rl": [
            { "timestamp": 1700000000.0, "counts": { "YouTube": 4 } },
            { "timestamp": 1700000001.0, "counts": { "YouTube": 2, "Voice Call": 1 } }
        ],
        "rr": [],
        "cqi": []
    }))
}

async fn add_traffic_stream(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    assert_eq!(body["user_density"], "high");
    assert_eq!(body["traffic_type"], "Voice Call");
    Json(json!({ "status": "stream_started", "stream_id": "stream-42" }))
}

async fn remove_traffic_stream(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    assert_eq!(body["stream_id"], "stream-42");
    Json(json!({ "status": "stream_stopped" }))
}

async fn stop_all_streams() -> impl IntoResponse {
    Json(json!({ "status": "all_stopped" }))
}

async fn switch_qos_mode() -> impl IntoResponse {
    Json(json!({ "mode": "RR" }))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

/// Spawn the mock backend on a random port.
///
/// Returns (base_url, shutdown_sender); the server stops when the sender is
/// dropped or fired.
fn spawn_mock_backend() -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let app = Router::new()
        .route("/get_statistics/", get(get_statistics))
        .route("/get_traffic_types/", get(get_traffic_types))
        .route("/get_traffic_type_counts/", get(get_traffic_type_counts))
        .route("/add_traffic_stream", post(add_traffic_stream))
        .route("/remove_traffic_stream", post(remove_traffic_stream))
        .route("/stop_all_streams", post(stop_all_streams))
        .route("/switch_qos_mode", post(switch_qos_mode));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let server = axum::serve(
            tokio::net::TcpListener::from_std(listener).unwrap(),
            app,
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        server.await.unwrap();
    });

    (base_url, shutdown_tx)
}

#[tokio::test]
async fn statistics_roundtrip() {
    let (base_url, _shutdown) = spawn_mock_backend();
    let client = SimulatorClient::builder().endpoint(&base_url).build();

    let stats = client.statistics().await.unwrap();
    assert_eq!(stats.rl.throughput, 42.5);
    assert_eq!(stats.rr.fairness_index, 0.97);
    assert_eq!(stats.cqi.average_latency, 16.5);
}

#[tokio::test]
async fn traffic_types_roundtrip() {
    let (base_url, _shutdown) = spawn_mock_backend();
    let client = SimulatorClient::builder().endpoint(&base_url).build();

    let catalog = client.traffic_types().await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog["YouTube"].data_rate, 50.0);
}

#[tokio::test]
async fn traffic_type_counts_roundtrip() {
    let (base_url, _shutdown) = spawn_mock_backend();
    let client = SimulatorClient::builder().endpoint(&base_url).build();

    let counts = client.traffic_type_counts().await.unwrap();
    assert_eq!(counts.rl.len(), 2);
    assert_eq!(counts.rl[1].counts["Voice Call"], 1);
    assert!(counts.rr.is_empty());
}

#[tokio::test]
async fn stream_lifecycle() {
    let (base_url, _shutdown) = spawn_mock_backend();
    let client = SimulatorClient::builder().endpoint(&base_url).build();

    let response = client.add_stream(UserDensity::High, "Voice Call").await.unwrap();
    assert!(response.started());
    assert_eq!(response.stream_id, "stream-42");

    client.remove_stream(&response.stream_id).await.unwrap();
    client.stop_all_streams().await.unwrap();
}

#[tokio::test]
async fn switch_qos_mode_returns_new_mode() {
    let (base_url, _shutdown) = spawn_mock_backend();
    let client = SimulatorClient::builder().endpoint(&base_url).build();

    let response = client.switch_qos_mode().await.unwrap();
    assert_eq!(response.mode, "RR");
}

#[tokio::test]
async fn server_error_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let app = Router::new().route("/get_statistics/", get(broken));
    let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(tokio::net::TcpListener::from_std(listener).unwrap(), app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    let client = SimulatorClient::builder().endpoint(&base_url).build();
    match client.statistics().await {
        Err(ClientError::Http(msg)) => assert!(msg.contains("500")),
        other => panic!("expected Http error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn connection_refused_is_classified() {
    // Bind and immediately drop a listener so the port is closed.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = SimulatorClient::builder()
        .endpoint(format!("http://127.0.0.1:{}", port))
        .build();

    match client.statistics().await {
        Err(ClientError::Connection(_)) | Err(ClientError::Timeout) => {}
        other => panic!("expected Connection error, got {:?}", other.map(|_| ())),
    }
}
