//! Password hashing.
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt>$<hash>` with salt and
//! hash in unpadded standard base64. The derived key is 32 bytes of
//! PBKDF2-HMAC-SHA256.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use pbkdf2::pbkdf2_hmac_array;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_BYTES: usize = 16;
const KEY_BYTES: usize = 32;

pub const DEFAULT_ITERATIONS: u32 = 100_000;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to derive password key: {0}")]
    Derive(String),
}

/// Hashes and verifies user passwords.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Returns false for a wrong password and for malformed stored hashes.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// PBKDF2-HMAC-SHA256 with a random per-password salt.
#[derive(Debug, Clone)]
pub struct Pbkdf2Hasher {
    iterations: u32,
}

impl Pbkdf2Hasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> [u8; KEY_BYTES] {
    pbkdf2_hmac_array::<Sha256, KEY_BYTES>(password, salt, iterations)
}

impl PasswordHasher for Pbkdf2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_BYTES];
        rand::rng().fill(&mut salt);
        let key = derive_key(password.as_bytes(), &salt, self.iterations);

        Ok(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(key)
        ))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let mut parts = stored.split('$');
        let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };

        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (
            STANDARD_NO_PAD.decode(salt),
            STANDARD_NO_PAD.decode(expected),
        ) else {
            return false;
        };
        if iterations == 0 || expected.len() != KEY_BYTES {
            return false;
        }

        let key = derive_key(password.as_bytes(), &salt, iterations);
        key.as_slice().ct_eq(expected.as_slice()).into()
    }
}
