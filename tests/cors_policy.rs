//! Cross-Origin Policy Tests
//!
//! Preflight requests short-circuit with 204 and every response, including
//! errors from the item router, carries the allow headers.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use modtrack::http_server::app;
use modtrack::rest_api::ItemService;
use modtrack::store::SqliteItemStore;
use tower::ServiceExt;

fn router() -> Router {
    app(ItemService::new(SqliteItemStore::open_in_memory().unwrap()))
}

async fn call(router: &Router, method: &str, uri: &str, body: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

fn assert_cors_headers<B>(response: &Response<B>) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn test_preflight_returns_no_content() {
    let router = router();

    for uri in ["/items", "/items/for-sync", "/items/mark-linked", "/unknown"] {
        let response = call(&router, "OPTIONS", uri, "").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{uri}");
        assert_cors_headers(&response);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }
}

/// A preflight never touches the store
#[tokio::test]
async fn test_preflight_has_no_side_effects() {
    let router = router();
    let payload = r#"{"title":"t","status":"not_started","deadline":"2024-01-01"}"#;

    let response = call(&router, "OPTIONS", "/items", payload).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = call(&router, "GET", "/items", "").await;
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], br#"{"modifications":[]}"#);
}

#[tokio::test]
async fn test_headers_on_every_response() {
    let router = router();
    let payload = r#"{"title":"t","status":"not_started","deadline":"2024-01-01"}"#;

    let cases = [
        ("POST", "/items", payload, StatusCode::CREATED),
        ("GET", "/items", "", StatusCode::OK),
        ("GET", "/items/for-sync", "", StatusCode::OK),
        ("DELETE", "/items?id=1", "", StatusCode::NO_CONTENT),
        ("POST", "/items", "{", StatusCode::BAD_REQUEST),
        ("GET", "/unknown", "", StatusCode::NOT_FOUND),
        ("PATCH", "/items", "", StatusCode::METHOD_NOT_ALLOWED),
    ];

    for (method, uri, body, expected) in cases {
        let response = call(&router, method, uri, body).await;
        assert_eq!(response.status(), expected, "{method} {uri}");
        assert_cors_headers(&response);
    }
}

#[tokio::test]
async fn test_json_content_type() {
    let router = router();
    let response = call(&router, "GET", "/items", "").await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let response = call(&router, "GET", "/nowhere", "").await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}
