//! Admin accounts.

use serde::{Deserialize, Serialize};

use crate::types::{string_or_number, RecordId};

/// Stored admin account.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserInfo`] for external-facing output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: RecordId,
    pub email: String,
    /// Argon2id PHC string, or a legacy SHA-256 hex digest when `salt` is set.
    pub password_hash: String,
    /// Present only on accounts that still carry a legacy salted SHA-256 hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    pub name: String,
}

/// Safe user representation for API responses (no password material).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub id: RecordId,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Account written when the users document is empty.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl SeedUser {
    pub fn into_user(self, id: RecordId) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            salt: None,
            name: self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_info_omits_hash() {
        let user = User {
            id: "1".into(),
            email: "a@b.c".into(),
            password_hash: "h".into(),
            salt: Some("s".into()),
            name: "Admin".into(),
        };
        let json = serde_json::to_value(UserInfo::from(&user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "a@b.c");
    }

    #[test]
    fn legacy_record_loads() {
        let user: User = serde_json::from_str(
            r#"{"id":"1","email":"a@b.c","passwordHash":"abc","salt":"somesalt","name":"Super Admin"}"#,
        )
        .unwrap();
        assert_eq!(user.salt.as_deref(), Some("somesalt"));
    }
}
