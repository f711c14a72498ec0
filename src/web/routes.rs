//! HTTP route handlers.

use super::error::ApiError;
use super::templates;
use crate::config::Config;
use crate::image_proc::{GridProcessor, GridResponse};
use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub processor: Arc<GridProcessor>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: Arc<Config>, processor: Arc<GridProcessor>) -> Self {
        let max_upload_bytes = config.max_upload_bytes;
        Self {
            config,
            processor,
            max_upload_bytes,
        }
    }
}

/// Form data posted by the drawing page
#[derive(Debug, Deserialize)]
pub struct DrawingForm {
    #[serde(default)]
    pub image_data_uri: String,
}

/// GET / - Drawing page
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(templates::render_drawing_page(&state.config))
}

/// POST /app - Convert a drawing to a grid and forward it
pub async fn submit_drawing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<DrawingForm>,
) -> Result<Json<GridResponse>, ApiError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let response = state
        .processor
        .process(&form.image_data_uri, user_agent)
        .await?;

    Ok(Json(response))
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
