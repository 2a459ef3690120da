//! Authentication: password hashing, session tokens, and identity
//! resolution.

pub mod identity;
pub mod password;
pub mod tokens;

pub use identity::{resolve_actor, IdentityError};
pub use password::{PasswordHasher, Pbkdf2Hasher};
pub use tokens::{Claims, JwtSigner, TokenSigner};
