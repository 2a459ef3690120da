//! Resolution of a bearer credential into an [`Actor`].
//!
//! Every failure here is an authentication failure (HTTP 401). Policy
//! denials on an authenticated actor are reported elsewhere as forbidden.

use thiserror::Error;

use super::tokens::TokenSigner;
use crate::model::Actor;
use crate::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Access denied. Invalid token format.")]
    InvalidFormat,

    #[error("Access denied. Invalid token.")]
    InvalidToken,

    #[error("Access denied. User not found.")]
    UserNotFound,
}

impl IdentityError {
    /// Stable machine-readable code for error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            IdentityError::MissingToken => "missing_token",
            IdentityError::InvalidFormat => "invalid_authorization",
            IdentityError::InvalidToken => "invalid_token",
            IdentityError::UserNotFound => "user_not_found",
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, IdentityError> {
    let value = authorization
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(IdentityError::MissingToken)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(IdentityError::InvalidFormat)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(IdentityError::InvalidFormat);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(IdentityError::InvalidFormat);
    }
    Ok(token)
}

/// Verifies the bearer token and confirms its user still exists.
///
/// The returned role comes from the token claims, not the user record.
pub async fn resolve_actor(
    authorization: Option<&str>,
    signer: &dyn TokenSigner,
    users: &UserStore,
) -> Result<Actor, IdentityError> {
    let token = bearer_token(authorization)?;

    let claims = signer.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        IdentityError::InvalidToken
    })?;

    if !users.contains(&claims.id).await {
        return Err(IdentityError::UserNotFound);
    }

    Ok(claims.actor())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use evently_id::UserId;
    use rstest::rstest;

    use super::*;
    use crate::auth::tokens::JwtSigner;
    use crate::model::{Role, User};

    fn signer() -> JwtSigner {
        JwtSigner::new(b"identity-secret", Duration::hours(24))
    }

    async fn store_with(id: UserId, role: Role) -> UserStore {
        let users = UserStore::new();
        users
            .insert(User {
                id,
                name: "Org".to_string(),
                email: "org@example.com".to_string(),
                password_hash: "x".to_string(),
                role,
            })
            .await
            .unwrap();
        users
    }

    #[rstest]
    #[case(None, IdentityError::MissingToken)]
    #[case(Some(""), IdentityError::MissingToken)]
    #[case(Some("Bearer"), IdentityError::InvalidFormat)]
    #[case(Some("Bearer   "), IdentityError::InvalidFormat)]
    #[case(Some("Basic abc"), IdentityError::InvalidFormat)]
    #[case(Some("abc.def.ghi"), IdentityError::InvalidFormat)]
    fn test_bearer_token_rejections(#[case] header: Option<&str>, #[case] expected: IdentityError) {
        assert_eq!(bearer_token(header), Err(expected));
    }

    #[test]
    fn test_bearer_token_accepts_any_case() {
        assert_eq!(bearer_token(Some("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(Some("bearer  abc ")), Ok("abc"));
    }

    #[tokio::test]
    async fn test_resolves_actor_from_claims() {
        let id = UserId::new();
        let users = store_with(id, Role::Attendee).await;
        let signer = signer();
        // Token role wins over the stored role.
        let token = signer
            .issue(&Actor {
                id,
                role: Role::Organizer,
            })
            .unwrap()
            .token;

        let actor = resolve_actor(Some(&format!("Bearer {token}")), &signer, &users)
            .await
            .unwrap();
        assert_eq!(actor.id, id);
        assert_eq!(actor.role, Role::Organizer);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let users = UserStore::new();
        let err = resolve_actor(Some("Bearer nope"), &signer(), &users)
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::InvalidToken);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let users = store_with(UserId::new(), Role::Organizer).await;
        let signer = signer();
        let token = signer
            .issue(&Actor {
                id: UserId::new(),
                role: Role::Organizer,
            })
            .unwrap()
            .token;

        let err = resolve_actor(Some(&format!("Bearer {token}")), &signer, &users)
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::UserNotFound);
    }
}
