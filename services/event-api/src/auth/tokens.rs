//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and role:
//!
//! ```text
//! { "id": "usr_…", "role": "organizer", "iat": 1735689600, "exp": 1735776000 }
//! ```
//!
//! The role in the token is authoritative for the lifetime of the token; a
//! role change only takes effect at the next login.

use chrono::{DateTime, Duration, Utc};
use evently_id::UserId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Actor, Role};

/// Default session lifetime.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("token lifetime {0} overflows the expiry timestamp")]
    Lifetime(Duration),
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens.
pub trait TokenSigner: Send + Sync {
    fn issue(&self, actor: &Actor) -> Result<IssuedToken, TokenError>;

    /// Checks signature and expiry and returns the embedded claims.
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HMAC-SHA256 JWT signer with a shared secret.
pub struct JwtSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl JwtSigner {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }
}

impl TokenSigner for JwtSigner {
    fn issue(&self, actor: &Actor) -> Result<IssuedToken, TokenError> {
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::Lifetime(self.lifetime))?;
        let claims = Claims {
            id: actor.id,
            role: actor.role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Sign)?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> JwtSigner {
        JwtSigner::new(b"test-secret", Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS))
    }

    fn organizer() -> Actor {
        Actor {
            id: UserId::new(),
            role: Role::Organizer,
        }
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let signer = JwtSigner::new(b"test-secret", Duration::MAX);
        assert!(matches!(
            signer.issue(&organizer()),
            Err(TokenError::Lifetime(_))
        ));
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = signer();
        let actor = organizer();
        let issued = signer.issue(&actor).unwrap();

        let claims = signer.verify(&issued.token).unwrap();
        assert_eq!(claims.actor(), actor);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = signer().issue(&organizer()).unwrap();
        let other = JwtSigner::new(b"other-secret", Duration::hours(1));
        assert!(matches!(
            other.verify(&issued.token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let issued = signer
            .issue(&Actor {
                id: UserId::new(),
                role: Role::Attendee,
            })
            .unwrap();

        let mut parts: Vec<String> = issued.token.split('.').map(str::to_string).collect();
        parts[1] = parts[1].chars().rev().collect();
        let tampered = parts.join(".");
        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn test_expired_rejected() {
        let expired = JwtSigner::new(b"test-secret", Duration::hours(-1));
        let issued = expired.issue(&organizer()).unwrap();
        assert!(signer().verify(&issued.token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(signer().verify("not-a-token").is_err());
        assert!(signer().verify("").is_err());
    }
}
