#![forbid(unsafe_code)]
//! Credential primitives: Argon2id password hashing and the signed, time-bound
//! identity token. There is no revocation list; a token stays valid for its
//! full lifetime regardless of later password changes or logout.

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer, TOKEN_TTL_SECS};

pub const CRATE_NAME: &str = "lumina-auth";

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    /// Hashing or hash-parsing failed. Distinct from a mismatch, which is a
    /// normal `Ok(false)` outcome.
    Hash(String),
    /// The token is malformed, tampered with, or past its expiry.
    InvalidToken(String),
    /// Token creation failed.
    Issue(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(msg) => write!(f, "password hash error: {msg}"),
            Self::InvalidToken(msg) => write!(f, "invalid token: {msg}"),
            Self::Issue(msg) => write!(f, "token issue error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}
