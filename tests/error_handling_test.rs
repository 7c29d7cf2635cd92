mod common;

use axum::http::Method;
use common::{TestApp, failing_router, send, send_raw};
use rci_last_call::infrastructure::store::Collection;
use serde_json::json;

#[tokio::test]
async fn store_failures_become_generic_500s() {
    let router = failing_router();

    for (method, uri, body) in [
        (Method::GET, "/resorts", None),
        (Method::GET, "/all-resorts", None),
        (Method::POST, "/resorts", Some(json!({ "location": "Aruba" }))),
        (Method::GET, "/all-users", None),
        (Method::GET, "/users?email=a@x.com", None),
        (
            Method::POST,
            "/users",
            Some(json!({ "name": "Ana", "email": "a@x.com" })),
        ),
        (
            Method::PATCH,
            "/update-user",
            Some(json!({ "email": "a@x.com", "isAdmin": true })),
        ),
        (Method::GET, "/all-bookings", None),
        (Method::POST, "/payment-info", Some(json!({ "email": "a@x.com" }))),
    ] {
        let (status, body) = send(&router, method, uri, body).await;

        assert_eq!(status, 500, "{uri}");
        assert_eq!(body, json!({ "error": "Internal Server Error" }), "{uri}");
    }
}

#[tokio::test]
async fn failed_search_is_not_found() {
    let router = failing_router();
    let (status, body) = send(&router, Method::GET, "/resorts/search?key=x", None).await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "Search Not Found" }));
}

#[tokio::test]
async fn validation_runs_before_the_store() {
    let router = failing_router();

    let (status, _) = send(&router, Method::POST, "/users", Some(json!({ "name": "Ana" }))).await;
    assert_eq!(status, 400);

    let (status, _) = send(
        &router,
        Method::PATCH,
        "/update-user",
        Some(json!({ "email": "a@x.com", "isAdmin": 1 })),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn malformed_bodies_are_json_bad_requests() {
    let app = TestApp::new();

    for (content_type, body) in [
        (Some("application/json"), "[1,2]"),
        (Some("application/json"), "{not json"),
        (Some("application/json"), "\"Ana\""),
        (None, r#"{"name":"Ana","email":"a@x.com"}"#),
        (Some("text/plain"), r#"{"name":"Ana","email":"a@x.com"}"#),
    ] {
        let (status, error) =
            send_raw(&app.router, Method::POST, "/users", content_type, body).await;

        assert_eq!(status, 400, "{body} ({content_type:?})");
        assert!(error["error"].is_string(), "{body} ({content_type:?})");
    }

    assert_eq!(app.count(Collection::Users).await, 0);
}

#[tokio::test]
async fn malformed_patch_body_is_rejected_before_the_store() {
    let router = failing_router();
    let (status, error) = send_raw(
        &router,
        Method::PATCH,
        "/resorts/abc",
        Some("application/json"),
        "[]",
    )
    .await;

    assert_eq!(status, 400);
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/resorts")
        .header("origin", "https://rci.example")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap();

    let response = failing_router().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
