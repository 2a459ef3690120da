//! HTTP API handlers and routing.

mod accounts;
pub mod error;
mod events;
mod health;
mod json;
pub mod request_context;

use std::any::Any;

use axum::{
    http::{header, HeaderValue, Method, Request},
    response::{IntoResponse, Response},
    Router,
};
use evently_id::RequestId;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{self, MakeRequestId, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::state::AppState;

/// Generates `req_<ulid>` ids for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
struct MakeUlidRequestId;

impl MakeRequestId for MakeUlidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<request_id::RequestId> {
        HeaderValue::from_str(&RequestId::new().to_string())
            .ok()
            .map(request_id::RequestId::new)
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!(panic = %detail, "Request handler panicked");

    ApiError::internal("internal_error", "Internal server error").into_response()
}

async fn route_not_found(ctx: RequestContext) -> ApiError {
    ApiError::not_found("route_not_found", "Route not found").with_request_id(ctx.request_id)
}

/// Create the main API router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(AnyOrigin);

    Router::new()
        // No auth
        .merge(health::routes())
        .merge(accounts::routes())
        // Bearer token required
        .merge(events::routes())
        .fallback(route_not_found)
        // Middleware, innermost first
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeUlidRequestId))
        .with_state(state)
}
