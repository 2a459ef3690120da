//! Account endpoints.
//!
//! Endpoints:
//! - POST /register - Create a user account
//! - POST /login    - Exchange credentials for a session token

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::json::ApiJson;
use crate::api::request_context::RequestContext;
use crate::model::{LoginInput, RegistrationInput};
use crate::service::accounts;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

async fn register(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<RegistrationInput>,
) -> Result<Response, ApiError> {
    accounts::register(&state, &input)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(ctx.request_id))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    )
        .into_response())
}

async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Response, ApiError> {
    let outcome = accounts::login(&state, &input)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(ctx.request_id))?;

    Ok(Json(outcome).into_response())
}
