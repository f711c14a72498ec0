//! Web server module.
//!
//! Serves the drawing page and the grid endpoint using Axum.

pub mod error;
pub mod routes;
pub mod templates;

use crate::config::Config;
use crate::image_proc::GridProcessor;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use routes::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

pub use error::ApiError;

/// Web server errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),

    #[error("Server error: {0}")]
    ServerError(String),
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(routes::index))
        .route("/app", post(routes::submit_drawing))
        .route("/app/", post(routes::submit_drawing))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Web server
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    /// Create a new web server
    pub fn new(config: Config) -> Self {
        let processor = Arc::new(GridProcessor::new(&config));
        Self {
            state: AppState::new(Arc::new(config), processor),
        }
    }

    /// Run the web server with graceful shutdown
    pub async fn run_with_shutdown(
        &self,
        port: u16,
        shutdown: tokio::sync::broadcast::Receiver<()>,
    ) -> Result<(), WebError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Web server listening on http://{}", addr);

        let mut shutdown = shutdown;
        axum::serve(listener, build_router(self.state.clone()))
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Web server shutting down gracefully");
            })
            .await
            .map_err(|e| WebError::ServerError(e.to_string()))
    }
}
