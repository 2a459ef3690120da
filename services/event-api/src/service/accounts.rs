//! User registration and login.

use chrono::{DateTime, Utc};
use evently_id::UserId;
use serde::Serialize;
use tracing::{error, info};

use super::ServiceError;
use crate::model::{Actor, LoginInput, RegistrationInput, User, UserProfile};
use crate::state::AppState;
use crate::validation::{validate_login, validate_registration};

/// Successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

/// Creates a user account. The email must not already be registered.
pub async fn register(
    state: &AppState,
    input: &RegistrationInput,
) -> Result<UserProfile, ServiceError> {
    let account = validate_registration(input)?;

    // Skip hashing for an email that is clearly taken; the insert below
    // re-checks under the store lock.
    if state.users().find_by_email(&account.email).await.is_some() {
        return Err(ServiceError::Conflict("Email already exists".to_string()));
    }

    let hasher = state.passwords();
    let password = account.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            ServiceError::Internal(e.to_string())
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to hash password");
            ServiceError::Internal(e.to_string())
        })?;

    let user = User {
        id: UserId::new(),
        name: account.name,
        email: account.email,
        password_hash,
        role: account.role,
    };
    let profile = user.profile();

    state.users().insert(user).await?;
    info!(user_id = %profile.id, role = %profile.role, "User registered");

    Ok(profile)
}

/// Checks credentials and issues a session token.
pub async fn login(state: &AppState, input: &LoginInput) -> Result<LoginOutcome, ServiceError> {
    let credentials = validate_login(input)?;

    let Some(user) = state.users().find_by_email(credentials.email).await else {
        return Err(ServiceError::NotFound("User not found".to_string()));
    };

    let hasher = state.passwords();
    let password = credentials.password.to_string();
    let stored = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            ServiceError::Internal(e.to_string())
        })?;

    if !valid {
        info!(user_id = %user.id, "Login rejected: invalid password");
        return Err(ServiceError::Unauthenticated("Invalid password".to_string()));
    }

    let issued = state
        .tokens()
        .issue(&Actor {
            id: user.id,
            role: user.role,
        })
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "Failed to issue token");
            ServiceError::Internal(e.to_string())
        })?;

    info!(user_id = %user.id, "User logged in");

    Ok(LoginOutcome {
        token: issued.token,
        expires_at: issued.expires_at,
        user: user.profile(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Role;
    use crate::notify::testing::RecordingNotifier;

    fn state() -> AppState {
        AppState::for_tests(Arc::new(RecordingNotifier::default()))
    }

    fn registration(email: &str, role: Option<&str>) -> RegistrationInput {
        RegistrationInput {
            name: Some("Grace".to_string()),
            email: Some(email.to_string()),
            password: Some("password123".to_string()),
            role: role.map(str::to_string),
        }
    }

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hashed_password() {
        let state = state();
        let profile = register(&state, &registration("g@example.com", Some("organizer")))
            .await
            .unwrap();
        assert_eq!(profile.role, Role::Organizer);

        let stored = state.users().find_by_id(&profile.id).await.unwrap();
        assert_ne!(stored.password_hash, "password123");
        assert!(state.passwords().verify("password123", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let state = state();
        register(&state, &registration("dup@example.com", None))
            .await
            .unwrap();
        let err = register(&state, &registration("dup@example.com", Some("organizer")))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Conflict("Email already exists".to_string()));
        assert_eq!(state.users().len().await, 1);
    }

    #[tokio::test]
    async fn test_register_validation_error() {
        let err = register(&state(), &registration("not-an-email", None))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::InvalidInput("Invalid email format".to_string()));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let state = state();
        let profile = register(&state, &registration("l@example.com", Some("organizer")))
            .await
            .unwrap();

        let outcome = login(&state, &login_input("l@example.com", "password123"))
            .await
            .unwrap();
        assert_eq!(outcome.user, profile);

        let claims = state.tokens().verify(&outcome.token).unwrap();
        assert_eq!(claims.id, profile.id);
        assert_eq!(claims.role, Role::Organizer);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let state = state();
        register(&state, &registration("l@example.com", None))
            .await
            .unwrap();

        let err = login(&state, &login_input("missing@example.com", "password123"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound("User not found".to_string()));

        let err = login(&state, &login_input("l@example.com", "wrong-password"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Unauthenticated("Invalid password".to_string()));

        let err = login(&state, &LoginInput::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
