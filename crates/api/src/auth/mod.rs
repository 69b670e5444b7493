//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing plus verification of legacy salted
//!   SHA-256 hashes.
//! - [`jwt`] -- session token generation and validation.
//! - [`cookie`] -- the `admin_token` session cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
