mod common;

use common::{FakeTransport, Reply, client_with, paths_of};
use serde_json::json;

#[tokio::test]
async fn bound_system_authenticates() {
    let transport = FakeTransport::new().route("/getEssList", Reply::success(json!([{"sysSn": "X1"}])));
    let calls = transport.calls();
    let client = client_with(transport);

    assert!(client.authenticate().await.unwrap());
    assert_eq!(paths_of(&calls), vec!["/getEssList"]);
}

#[tokio::test]
async fn numeric_serial_counts() {
    let client = client_with(
        FakeTransport::new().route("/getEssList", Reply::success(json!([{"sysSn": 2024001}]))),
    );
    assert!(client.authenticate().await.unwrap());
}

#[tokio::test]
async fn empty_list_does_not_authenticate() {
    let client = client_with(FakeTransport::new().route("/getEssList", Reply::success(json!([]))));
    assert!(!client.authenticate().await.unwrap());
}

#[tokio::test]
async fn entries_without_serial_do_not_authenticate() {
    let client = client_with(
        FakeTransport::new().route("/getEssList", Reply::success(json!([{"popv": 5.0}, {"sysSn": ""}]))),
    );
    assert!(!client.authenticate().await.unwrap());
}

#[tokio::test]
async fn rejected_credentials_do_not_authenticate() {
    let client = client_with(FakeTransport::new().route(
        "/getEssList",
        Reply::envelope(json!({"code": 6002, "msg": "Sign verification error", "data": null})),
    ));
    assert!(!client.authenticate().await.unwrap());
}

#[tokio::test]
async fn non_array_list_does_not_authenticate() {
    let client = client_with(
        FakeTransport::new().route("/getEssList", Reply::success(json!({"sysSn": "X1"}))),
    );
    assert!(!client.authenticate().await.unwrap());
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    let client = client_with(FakeTransport::new().route("/getEssList", Reply::ConnectionError));
    let err = client.authenticate().await.unwrap_err();
    assert!(err.is_transport());
}
