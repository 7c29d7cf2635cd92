#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use rci_last_call::{
    AppState, create_router,
    infrastructure::{
        DocumentStore, MemoryStore, StoreError,
        store::{Collection, Filter, InsertAck, UpdateOutcome, Window},
    },
    models::Record,
};
use serde_json::Value;
use tower::ServiceExt;

pub const MAX_PAGE_LIMIT: u64 = 100;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = create_router(AppState::new(store.clone(), MAX_PAGE_LIMIT));
        Self { router, store }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.router, method, uri, body).await
    }

    pub async fn count(&self, collection: Collection) -> u64 {
        self.store.count(collection).await.unwrap()
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    read_response(router, request).await
}

/// Sends `body` as-is, with an optional `Content-Type`
pub async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(CONTENT_TYPE, content_type);
    }

    read_response(router, request.body(Body::from(body)).unwrap()).await
}

async fn read_response(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, value)
}

/// Store whose every call fails, for exercising the 5xx/404 mapping
pub struct FailingStore;

fn unreachable_store() -> StoreError {
    StoreError::Connection("server selection timeout: mongo-secret-host:27017".to_string())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_one(&self, _: Collection, _: Record) -> Result<InsertAck, StoreError> {
        Err(unreachable_store())
    }

    async fn find(
        &self,
        _: Collection,
        _: &Filter,
        _: Option<Window>,
    ) -> Result<Vec<Record>, StoreError> {
        Err(unreachable_store())
    }

    async fn find_one(&self, _: Collection, _: &Filter) -> Result<Option<Record>, StoreError> {
        Err(unreachable_store())
    }

    async fn count(&self, _: Collection) -> Result<u64, StoreError> {
        Err(unreachable_store())
    }

    async fn update_one(
        &self,
        _: Collection,
        _: &Filter,
        _: Record,
    ) -> Result<UpdateOutcome, StoreError> {
        Err(unreachable_store())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable_store())
    }

    async fn shutdown(&self) {}
}

pub fn failing_router() -> Router {
    create_router(AppState::new(Arc::new(FailingStore), MAX_PAGE_LIMIT))
}
