//! Multipart dispatcher tests against a local mock server.

mod support;

use datora_adapters::prelude::*;
use serde_json::json;
use support::multipart_field;
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter() -> FormDataRequestAdapter {
    FormDataRequestAdapter::new().expect("adapter builds")
}

#[tokio::test]
async fn sends_fields_as_multipart_with_caller_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activate"))
        .and(header("x-tenant", "acme"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::post(format!("{}/api/activate", server.uri()))
        .with_header("x-tenant", "acme")
        .with_field("msisdn", "5511999999999")
        .with_field("quantity", 3)
        .with_field("payload", json!({"plan": "pro"}));

    let response = adapter().request(request).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, json!({"status": "ok"}));
    assert!(response.is_success());

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body).to_string();
    assert_eq!(multipart_field(&body, "msisdn").as_deref(), Some("5511999999999"));
    assert_eq!(multipart_field(&body, "quantity").as_deref(), Some("3"));
    assert_eq!(
        multipart_field(&body, "payload").as_deref(),
        Some(r#"{"plan":"pro"}"#)
    );
}

#[tokio::test]
async fn put_requests_use_the_given_method() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/lines/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::put(format!("{}/api/lines/1", server.uri())).with_field("a", "b");
    let response = adapter().request(request).await.unwrap();
    assert_eq!(response.status_code, 204);
}

#[tokio::test]
async fn error_statuses_are_returned_as_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": "not found"}))
                .insert_header("x-request-id", "r-42"),
        )
        .mount(&server)
        .await;

    let response = adapter()
        .request(HttpRequest::post(format!("{}/missing", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status_code, 404);
    assert!(!response.is_success());
    assert_eq!(response.body["error"], "not found");
    assert_eq!(response.header("X-Request-Id"), Some("r-42"));
}

#[tokio::test]
async fn non_json_bodies_come_back_as_strings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let response = adapter()
        .request(HttpRequest::post(server.uri()).with_field("k", "v"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, json!("upstream exploded"));
}

#[tokio::test]
async fn caller_content_type_is_replaced_by_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::post(server.uri())
        .with_header("Content-Type", "application/json")
        .with_field("k", "v");
    let response = adapter().request(request).await.unwrap();
    assert_eq!(response.status_code, 200);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].headers.get_all("content-type").iter().count(), 1);
}

#[tokio::test]
async fn unreachable_host_is_a_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = adapter()
        .request(HttpRequest::post(format!("http://127.0.0.1:{port}/")).with_field("k", "v"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "REQUEST_ERROR");
    assert!(err.is_transport());
    assert!(err.to_string().starts_with("REQUEST_ERROR"));
}

#[tokio::test]
async fn slow_upstream_times_out_as_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)))
        .mount(&server)
        .await;

    let adapter = FormDataRequestAdapter::builder()
        .pool(
            PoolConfig::builder()
                .timeout(Some(std::time::Duration::from_millis(200)))
                .build(),
        )
        .build()
        .unwrap();

    let err = adapter
        .request(HttpRequest::post(server.uri()).with_field("k", "v"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "REQUEST_ERROR");
    assert!(err.is_transport());
    assert_eq!(adapter.available_sockets(), 100);
}

#[tokio::test]
async fn invalid_header_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = adapter()
        .request(HttpRequest::post(server.uri()).with_header("bad header", "x"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn concurrent_requests_respect_the_socket_bound() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(6)
        .mount(&server)
        .await;

    let adapter = FormDataRequestAdapter::builder()
        .pool(PoolConfig::builder().max_sockets(2).max_idle_sockets(2).build())
        .build()
        .unwrap();

    let calls = (0..6).map(|i| {
        let adapter = adapter.clone();
        let url = server.uri();
        async move {
            adapter
                .request(HttpRequest::post(url).with_field("n", i))
                .await
        }
    });
    let handles: Vec<_> = calls.map(tokio::spawn).collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().status_code, 200);
    }
    assert_eq!(adapter.available_sockets(), 2);
}
