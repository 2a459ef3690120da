//! # evently-id
//!
//! Typed identifiers for the evently API.
//!
//! Every identifier is a ULID wrapped in a newtype and rendered with a short
//! resource prefix: `{prefix}_{ulid}`.
//!
//! Examples:
//! - `usr_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `evt_01HV4Z3MXNKPQR9HSTZ7WCLD4E`
//! - `req_01HV4Z4NYPLTRS0JTUA8XDME5F`
//!
//! Because ULIDs embed a millisecond timestamp, identifiers of the same kind
//! sort in creation order. Parsing is strict: the prefix must match the type.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
