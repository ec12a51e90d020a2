//! HTTP contract tests for the backend API client
//!
//! Runs the client against a local mock server so the status-to-error
//! mapping and body parsing are exercised over a real socket.

#![allow(clippy::unwrap_used)]

use seal_viewer_api::{ApiClient, ApiError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_success_returns_auth_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_json(json!({ "username": "alice", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "idToken": "h.p.s",
            "refreshToken": "refresh-1",
            "expiresIn": 3600,
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let response = client.login("alice", "s3cret").await.unwrap();

    assert_eq!(response.id_token, "h.p.s");
    assert_eq!(response.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(response.expires_in, 3600);
}

#[tokio::test]
async fn login_rejection_maps_to_auth_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Failed to authenticate." })),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let error = client.login("alice", "wrong").await.unwrap_err();

    assert_eq!(
        error,
        ApiError::AuthFailed {
            message: "Failed to authenticate.".to_string()
        }
    );
}

#[tokio::test]
async fn login_429_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "message": "Too many requests." })),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let error = client.login("alice", "s3cret").await.unwrap_err();

    assert_eq!(error, ApiError::RateLimited);
}

#[tokio::test]
async fn refresh_tolerates_missing_replacement_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "idToken": "h.p.s2",
            "expiresIn": 3600,
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let response = client.refresh("refresh-1").await.unwrap();

    assert_eq!(response.id_token, "h.p.s2");
    assert!(response.refresh_token.is_none());
}

#[tokio::test]
async fn fetch_images_preserves_server_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seals/seal-7/images"))
        .and(header("Authorization", "h.p.s"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "b.jpg", "url": "https://signed/b", "size": 200 },
            { "name": "a.jpg", "url": "https://signed/a", "size": 100,
              "lastModified": "2024-05-01T12:00:00Z" },
        ])))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let images = client.fetch_images("seal-7", "h.p.s").await.unwrap();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].name, "b.jpg");
    assert_eq!(images[0].url, "https://signed/b");
    assert_eq!(images[0].size, 200);
    assert_eq!(images[1].name, "a.jpg");
    assert!(images[1].last_modified.is_some());
}

#[tokio::test]
async fn fetch_images_401_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seals/seal-7/images"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized." })),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let error = client.fetch_images("seal-7", "stale").await.unwrap_err();

    assert_eq!(
        error,
        ApiError::QueryFailed {
            status: 401,
            message: "Unauthorized.".to_string()
        }
    );
}

#[tokio::test]
async fn unreachable_backend_maps_to_network_unavailable() {
    // Nothing listens on this port; the connection is refused before any
    // HTTP status exists.
    let client = ApiClient::new("http://127.0.0.1:9");
    let error = client.fetch_images("seal-7", "h.p.s").await.unwrap_err();

    assert!(error.is_transport());
}

#[tokio::test]
async fn publish_upload_url_returns_presigned_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/seals/seal-7/images/new.jpg/upload-url"))
        .and(header("Authorization", "h.p.s"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "url": "https://signed/put" })),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let upload = client
        .publish_upload_url("seal-7", "new.jpg", "h.p.s")
        .await
        .unwrap();

    assert_eq!(upload.url, "https://signed/put");
}
