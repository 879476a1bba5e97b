//! `stockroom-auth` — session token boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns a bearer
//! token into validated [`SessionClaims`] and nothing more.

pub mod claims;
pub mod user;
pub mod verifier;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use user::UserId;
pub use verifier::{Hs256TokenVerifier, TokenVerifier, VerifyError};
