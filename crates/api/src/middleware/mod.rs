//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the signed-in admin from the session
//!   cookie or a Bearer token.

pub mod auth;
