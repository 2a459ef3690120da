//! Request-scoped context extracted from HTTP requests.

use axum::extract::FromRequestParts;
use axum::http::header::{AsHeaderName, AUTHORIZATION};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use evently_id::RequestId;

use crate::api::error::ApiError;
use crate::auth::{resolve_actor, IdentityError};
use crate::model::Actor;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

fn header_str(headers: &HeaderMap, name: impl AsHeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

impl RequestContext {
    fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = header_str(headers, REQUEST_ID_HEADER)
            .map(str::to_string)
            .unwrap_or_else(|| RequestId::new().to_string());
        Self { request_id }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// A request whose bearer token resolved to a known user.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub ctx: RequestContext,
    pub actor: Actor,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_headers(&parts.headers);
        let reject = |e: IdentityError| {
            ApiError::unauthorized(e.code(), e.to_string()).with_request_id(ctx.request_id.clone())
        };

        // A header that is present but not text is malformed, not missing.
        let authorization = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| reject(IdentityError::InvalidFormat))?,
            ),
        };

        let actor = resolve_actor(authorization, state.tokens(), state.users())
            .await
            .map_err(reject)?;

        Ok(Self { ctx, actor })
    }
}
