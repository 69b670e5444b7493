//! Password hashing and verification.
//!
//! New hashes use Argon2id with a random salt, stored as PHC strings. Older
//! accounts carry a hex `sha256(password + salt)` digest with a separate salt;
//! those verify through [`verify_legacy_password`] and are rehashed with
//! Argon2id after the next successful login or password change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use audition_core::user::User;
use sha2::{Digest, Sha256};

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Hex SHA-256 of `password` followed by `salt`.
pub fn legacy_hash(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_legacy_password(password: &str, salt: &str, hash: &str) -> bool {
    legacy_hash(password, salt).eq_ignore_ascii_case(hash)
}

/// Verify `password` against whichever hash format `user` carries.
pub fn verify_user_password(password: &str, user: &User) -> Result<bool, argon2::password_hash::Error> {
    match &user.salt {
        Some(salt) => Ok(verify_legacy_password(password, salt, &user.password_hash)),
        None => verify_password(password, &user.password_hash),
    }
}

/// Validate that a password meets minimum strength requirements.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");

        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_legacy_hash_matches_known_digest() {
        // sha256("admin" + "salt")
        assert_eq!(
            legacy_hash("admin", "salt"),
            "f9a81477552594c79f2abc3fc099daa896a6e3a3590a55ffa392b6000412e80b"
        );
    }

    #[test]
    fn test_user_with_salt_uses_legacy_check() {
        let user = User {
            id: "1".into(),
            email: "a@b.c".into(),
            password_hash: legacy_hash("admin", "s4lt"),
            salt: Some("s4lt".into()),
            name: "Admin".into(),
        };
        assert!(verify_user_password("admin", &user).unwrap());
        assert!(!verify_user_password("nope", &user).unwrap());
    }

    #[test]
    fn test_password_too_short() {
        let msg = validate_password_strength("short", 8).unwrap_err();
        assert!(msg.contains("at least 8 characters"));
        assert!(validate_password_strength("long-enough", 8).is_ok());
    }
}
