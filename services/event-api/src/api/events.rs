//! Event endpoints. All of them require a bearer token.
//!
//! Endpoints:
//! - GET    /events               - List events
//! - POST   /events               - Create an event (organizers)
//! - PUT    /events/{id}          - Update an event (owner)
//! - DELETE /events/{id}          - Delete an event (owner)
//! - POST   /events/{id}/register - Register as a participant

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use evently_id::EventId;
use serde::Serialize;

use crate::api::accounts::MessageResponse;
use crate::api::error::ApiError;
use crate::api::json::ApiJson;
use crate::api::request_context::Authenticated;
use crate::model::{Event, EventInput, EventSummary};
use crate::service::events;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", put(update_event).delete(delete_event))
        .route("/events/{id}/register", post(register_for_event))
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct EventResponse {
    pub message: String,
    pub event: Event,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct RegistrationResponse {
    pub message: String,
    pub event: EventSummary,
}

/// Ids that do not parse cannot name a stored event.
fn parse_event_id(raw: &str, request_id: &str) -> Result<EventId, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::not_found("not_found", "Event not found").with_request_id(request_id)
    })
}

async fn list_events(State(state): State<AppState>, _auth: Authenticated) -> Json<Vec<Event>> {
    Json(events::list(&state).await)
}

async fn create_event(
    State(state): State<AppState>,
    auth: Authenticated,
    ApiJson(input): ApiJson<EventInput>,
) -> Result<Response, ApiError> {
    let event = events::create(&state, &auth.actor, &input)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(auth.ctx.request_id))?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event created successfully".to_string(),
            event,
        }),
    )
        .into_response())
}

async fn update_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<EventInput>,
) -> Result<Response, ApiError> {
    let request_id = auth.ctx.request_id;
    let id = parse_event_id(&id, &request_id)?;

    let event = events::update(&state, &auth.actor, &id, &input)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(request_id))?;

    Ok(Json(EventResponse {
        message: "Event updated successfully".to_string(),
        event,
    })
    .into_response())
}

async fn delete_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let request_id = auth.ctx.request_id;
    let id = parse_event_id(&id, &request_id)?;

    events::delete(&state, &auth.actor, &id)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(request_id))?;

    Ok(Json(MessageResponse::new("Event deleted successfully")).into_response())
}

async fn register_for_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let request_id = auth.ctx.request_id;
    let id = parse_event_id(&id, &request_id)?;

    let summary = events::register(&state, &auth.actor, &id)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(request_id))?;

    Ok(Json(RegistrationResponse {
        message: "Successfully registered for the event".to_string(),
        event: summary,
    })
    .into_response())
}
