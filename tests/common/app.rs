//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use pixel_grid_server::config::Config;
use pixel_grid_server::image_proc::GridProcessor;
use pixel_grid_server::web::{build_router, routes::AppState};

/// Test application wrapping the production router
pub struct TestApp {
    router: axum::Router,
}

impl TestApp {
    /// Create a test app from a config
    pub fn with_config(config: Config) -> Self {
        let processor = Arc::new(GridProcessor::new(&config));
        let state = AppState::new(Arc::new(config), processor);
        Self {
            router: build_router(state),
        }
    }

    /// 2x2 grid, serpentine output, no controller
    pub fn new() -> Self {
        Self::with_config(Config {
            grid_width: 2,
            grid_height: 2,
            ..Config::default()
        })
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST an already encoded form body
    pub async fn post_form(&self, path: &str, headers: &[(&str, &str)], body: &str) -> TestResponse {
        let mut builder =
            Request::post(path).header("Content-Type", "application/x-www-form-urlencoded");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// POST a data URI as the `image_data_uri` field
    pub async fn post_drawing(&self, data_uri: &str) -> TestResponse {
        let body = format!("image_data_uri={}", super::fixtures::form_encode(data_uri));
        self.post_form("/app", &[], &body).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse { status, body }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}
