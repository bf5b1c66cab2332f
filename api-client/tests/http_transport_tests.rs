//! HTTP transport tests against a live mock server.

use api_client::{
    ApiClient, ClientConfig, HttpTransport, Outcome, RequestDescriptor, Transport,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn perform_returns_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pong".as_slice()))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&ClientConfig::new(server.uri())).unwrap();
    let response = transport
        .perform(&RequestDescriptor::get("/api/ping"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"pong");
}

#[tokio::test]
async fn refresh_posts_to_the_refresh_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&ClientConfig::new(server.uri())).unwrap();
    transport.refresh().await.unwrap();
}

#[tokio::test]
async fn rejected_refresh_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&ClientConfig::new(server.uri())).unwrap();
    assert!(transport.refresh().await.is_err());
}

#[tokio::test]
async fn full_pipeline_refreshes_after_a_401() {
    let server = MockServer::start().await;
    // First profile request is rejected, the one after the refresh succeeds.
    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u1",
                "email": "a@example.test",
                "firstName": "Ada",
                "lastName": "Lovelace",
            })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
    let profile = client.user_profile().await.unwrap();

    assert_eq!(profile.id, "u1");
    assert_eq!(profile.first_name, "Ada");
}

#[tokio::test]
async fn unreachable_server_is_offline() {
    // Nothing listens here.
    let config = ClientConfig::new("http://127.0.0.1:9")
        .with_connect_timeout(Duration::from_millis(200))
        .with_attempt_deadline(Duration::from_secs(1));
    let client = ApiClient::new(&config).unwrap();

    let outcome = client.send(RequestDescriptor::get("/api/ping")).await;
    assert!(outcome.is_offline(), "expected Offline, got {outcome:?}");
}

#[tokio::test]
async fn slow_response_hits_the_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
    let descriptor = RequestDescriptor::get("/api/slow").with_timeout(Duration::from_millis(50));

    let outcome = client.send(descriptor).await;
    assert!(outcome.is_offline(), "expected Offline, got {outcome:?}");
}

#[tokio::test]
async fn server_fault_surfaces_as_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
    let outcome = client.send(RequestDescriptor::get("/api/user/profile")).await;

    assert!(matches!(outcome, Outcome::ServerError { status: 502 }));
}
