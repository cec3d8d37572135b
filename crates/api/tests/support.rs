//! Shared helpers for handler tests: an app over the in-memory provider.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use verdant_api::{router, AppContext};
use verdant_core::testing::InMemoryProvider;
use verdant_domain::{Config, Environment};

/// Router plus the provider behind it, for asserting side effects.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<InMemoryProvider>,
}

pub fn app() -> TestApp {
    app_in(Environment::Development)
}

pub fn app_in(environment: Environment) -> TestApp {
    let provider = Arc::new(InMemoryProvider::new());
    let config = Config { environment, ..Config::default() };
    let context = AppContext::with_provider(config, provider.clone());
    TestApp { router: router(context), provider }
}

impl TestApp {
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("infallible router");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}
