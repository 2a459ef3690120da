//! Liveness endpoint.

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Returns 200 while the process is serving requests. Checks nothing else.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        message: "Virtual Event Management API is running!".to_string(),
    })
}
