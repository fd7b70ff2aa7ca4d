use alphaess::error::AlphaEssError;
use alphaess::{AlphaEssClient, Credentials};
use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

const APP_ID: &str = "alpha61a0e1b8e2f3c4d5";
const APP_SECRET: &str = "0123456789abcdef";

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn echo_headers(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "code": 200,
        "msg": "Success",
        "data": {
            "appId": header(&headers, "appid"),
            "sign": header(&headers, "sign"),
            "timestamp": header(&headers, "timestamp"),
            "userAgent": header(&headers, "user-agent"),
            "contentType": header(&headers, "content-type"),
            "query": query,
        }
    }))
}

async fn echo_body(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"code": 200, "msg": "Success", "data": body}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "oops")
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/getLastPowerData", get(echo_headers))
        .route("/api/updateChargeConfigInfo", post(echo_body))
        .route("/api/getEssList", get(broken));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> AlphaEssClient {
    AlphaEssClient::new(
        Credentials::new(APP_ID, APP_SECRET),
        &format!("http://{}/api", addr),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn get_sends_signed_headers_and_query() {
    let addr = spawn_server().await;
    let client = client_for(addr);

    let data = client.get_last_power_data("AL1").await.unwrap().unwrap();

    assert_eq!(data["appId"], APP_ID);
    assert_eq!(data["query"]["sysSn"], "AL1");
    assert_eq!(data["contentType"], "application/json");
    assert!(data["userAgent"].as_str().unwrap().starts_with("alphaess/"));

    let timestamp = data["timestamp"].as_str().unwrap();
    assert!(timestamp.parse::<i64>().is_ok());
    assert_eq!(
        data["sign"],
        alphaess::signer::sign(APP_ID, APP_SECRET, timestamp)
    );
}

#[tokio::test]
async fn post_sends_json_body() {
    let addr = spawn_server().await;
    let client = client_for(addr);

    let applied = client
        .set_battery_charge(
            "AL1",
            true,
            &alphaess::TimeWindow::new("01:00", "05:00"),
            &alphaess::TimeWindow::disabled(),
            90,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(applied["sysSn"], "AL1");
    assert_eq!(applied["batHighCap"], 90);
    assert_eq!(applied["gridCharge"], 1);
    assert_eq!(applied["timeChaf1"], "01:00");
    assert_eq!(applied["timeChae1"], "05:00");
}

#[tokio::test]
async fn server_error_status_is_transport_error() {
    let addr = spawn_server().await;
    let client = client_for(addr);

    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, AlphaEssError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn unknown_route_is_transport_error() {
    let addr = spawn_server().await;
    let client = client_for(addr);

    let err = client.get_charge_config_info("AL1").await.unwrap_err();
    assert!(matches!(err, AlphaEssError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn closed_owned_session_refuses_requests() {
    let addr = spawn_server().await;
    let mut client = client_for(addr);
    assert!(client.owns_session());

    client.close();
    let err = client.get_last_power_data("AL1").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn shared_session_survives_close() {
    let addr = spawn_server().await;
    let http = reqwest::Client::new();
    let mut client = AlphaEssClient::with_shared_client(
        Credentials::new(APP_ID, APP_SECRET),
        &format!("http://{}/api", addr),
        Duration::from_secs(5),
        http.clone(),
    );
    assert!(!client.owns_session());

    client.close();
    assert!(client.get_last_power_data("AL1").await.unwrap().is_some());

    // The caller can keep using its own session
    let resp = http
        .get(format!("http://{}/api/getLastPowerData", addr))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn silent_server_times_out() {
    // Accepts connections and holds them open without ever answering
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = AlphaEssClient::new(
        Credentials::new(APP_ID, APP_SECRET),
        &format!("http://{}/api", addr),
        Duration::from_millis(200),
    )
    .unwrap();

    let err = client.get_ess_list().await.unwrap_err();
    assert!(matches!(err, AlphaEssError::Timeout { .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn app_id_unusable_as_header_is_rejected_before_sending() {
    let addr = spawn_server().await;
    let client = AlphaEssClient::new(
        Credentials::new("alpha\nid", APP_SECRET),
        &format!("http://{}/api", addr),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client.get_last_power_data("AL1").await.unwrap_err();
    assert!(matches!(err, AlphaEssError::Validation { .. }));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let err = client.get_ess_list().await.unwrap_err();
    assert!(err.is_transport());
}
