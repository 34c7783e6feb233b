//! Common test utilities and helpers
#![allow(dead_code)]

use apush_coach_core::{
    api::build_router, error::Result, FeedbackGateway, FeedbackProvider, GatewaySource,
    GenerationOptions, ProviderReply,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ESSAY_PATH: &str = "/api/essay";

/// One recorded provider call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub role: String,
    pub task: String,
    pub options: GenerationOptions,
}

/// Provider that replays a fixed reply and records what it was sent
pub struct FakeProvider {
    reply: Mutex<Option<Result<ProviderReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeProvider {
    pub fn replying(reply: Result<ProviderReply>) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Some(reply)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackProvider for FakeProvider {
    async fn submit(
        &self,
        role_text: &str,
        task_text: &str,
        options: &GenerationOptions,
    ) -> Result<ProviderReply> {
        self.calls.lock().unwrap().push(RecordedCall {
            role: role_text.to_string(),
            task: task_text.to_string(),
            options: options.clone(),
        });
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(ProviderReply::default()))
    }
}

/// Router wired to a fake provider
pub fn router_with(provider: Arc<FakeProvider>) -> Router {
    let gateway = FeedbackGateway::new(provider, GenerationOptions::default());
    router_with_source(Arc::new(gateway))
}

pub fn router_with_source(source: Arc<dyn GatewaySource>) -> Router {
    build_router(ESSAY_PATH, source, "test-instance".to_string())
}

/// Send one request through the router
pub async fn send(
    router: Router,
    method: Method,
    body: Option<String>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(ESSAY_PATH);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}

/// Send a request and parse the JSON body
pub async fn send_json(
    router: Router,
    method: Method,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, _, bytes) = send(router, method, Some(body.to_string())).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Essay of exactly `len` non-whitespace characters
pub fn essay(len: usize) -> String {
    "The Columbian Exchange reshaped societies on both sides of the Atlantic. "
        .chars()
        .cycle()
        .filter(|c| !c.is_whitespace())
        .take(len)
        .collect()
}
