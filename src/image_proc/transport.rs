//! Forwarding to the display controller.
//!
//! One POST per grid, no retries. Whatever happens on the wire is reported
//! back as an [`ApiCall`]; a failed call never fails the request.
//!
//! Uses a shared HTTP client instead of building one per request.

use once_cell::sync::Lazy;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;

/// Content type the controller firmware expects
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Sent when the caller did not supply a User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for all controller calls
///
/// No request timeout is set; a call waits as long as the platform lets it.
/// Connections are not kept idle between calls.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .expect("Failed to create HTTP client")
});

/// Outcome of a controller call, reported verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiCall {
    /// HTTP status, absent if no response arrived
    pub code: Option<u16>,
    /// Response body, absent if none could be read
    pub response: Option<String>,
}

impl ApiCall {
    /// Call skipped or failed before a response arrived
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Join key/value pairs into the controller's body format
///
/// Pairs are concatenated without a separator and without percent-encoding,
/// exactly as deployed controllers parse them.
// TODO: confirm with the controller firmware whether pairs should be `&`-separated
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect()
}

/// Display controller endpoint
#[derive(Debug, Clone, Default)]
pub struct Transport {
    endpoint: Option<String>,
}

impl Transport {
    /// Create a transport; `None` or a blank URL disables it
    pub fn new(endpoint: Option<&str>) -> Self {
        let endpoint = endpoint
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        Self { endpoint }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// POST `data=<payload>` to the controller
    pub async fn send(&self, payload: &str, user_agent: Option<&str>) -> ApiCall {
        let Some(url) = self.endpoint() else {
            tracing::debug!("No endpoint URL configured, skipping controller call");
            return ApiCall::absent();
        };

        tracing::info!("Sending {} byte payload to {}", payload.len(), url);

        let result = HTTP_CLIENT
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(USER_AGENT, user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .body(form_body(&[("data", payload)]))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Controller call failed: {} for {}", e, url);
                return ApiCall::absent();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Controller answered {} for {}", status, url);
        }

        let body = match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Failed to read controller response body: {}", e);
                None
            }
        };

        ApiCall {
            code: Some(status.as_u16()),
            response: body,
        }
    }
}
