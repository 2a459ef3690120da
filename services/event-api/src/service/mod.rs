//! Account and event workflows.
//!
//! Workflows take the shared [`AppState`](crate::state::AppState) and an
//! explicitly resolved [`Actor`](crate::model::Actor), and report failures in
//! the [`ServiceError`] taxonomy. The HTTP layer maps that taxonomy onto
//! status codes.

pub mod accounts;
pub mod events;

use thiserror::Error;

use crate::auth::IdentityError;
use crate::policy::RegistrationDenial;
use crate::store::StoreError;
use crate::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::Unauthenticated(_) => "unauthenticated",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::InvalidInput(err.0)
    }
}

impl From<IdentityError> for ServiceError {
    fn from(err: IdentityError) -> Self {
        ServiceError::Unauthenticated(err.to_string())
    }
}

impl From<RegistrationDenial> for ServiceError {
    fn from(err: RegistrationDenial) -> Self {
        ServiceError::Conflict(err.to_string())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => ServiceError::Conflict("Email already exists".to_string()),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
