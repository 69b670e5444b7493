//! Repository for the `users.json` document.

use audition_core::user::User;

use crate::error::StoreError;
use crate::kind::ResourceKind;
use crate::store::JsonStore;

/// Id given to the account seeded into an empty users document.
pub const SEED_ADMIN_ID: &str = "1";

/// Provides lookup and credential updates for admin accounts.
pub struct UserRepo;

impl UserRepo {
    /// All accounts. An empty document is seeded with the store's configured
    /// admin account first.
    pub async fn list(store: &JsonStore) -> Result<Vec<User>, StoreError> {
        let lock = store.lock(ResourceKind::Users).await;
        let mut users: Vec<User> = store.load(&lock).await?;
        if users.is_empty() {
            if let Some(seed) = store.seed_admin() {
                tracing::info!(email = %seed.email, "Seeding default admin account");
                users.push(seed.clone().into_user(SEED_ADMIN_ID.to_string()));
                store.save(&lock, &users).await?;
            }
        }
        Ok(users)
    }

    /// Find an account by email, ignoring ASCII case.
    pub async fn find_by_email(store: &JsonStore, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim();
        Ok(Self::list(store)
            .await?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    pub async fn find_by_id(store: &JsonStore, id: &str) -> Result<Option<User>, StoreError> {
        Ok(Self::list(store).await?.into_iter().find(|u| u.id == id))
    }

    /// Store a new Argon2 hash for `id`, dropping any legacy salt.
    ///
    /// Returns `None` if no account has `id`.
    pub async fn set_password_hash(
        store: &JsonStore,
        id: &str,
        password_hash: String,
    ) -> Result<Option<User>, StoreError> {
        store
            .update(|users: &mut Vec<User>| {
                let user = users.iter_mut().find(|u| u.id == id)?;
                user.password_hash = password_hash;
                user.salt = None;
                Some(user.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use audition_core::user::SeedUser;

    use super::*;
    use crate::store::StoreConfig;

    async fn seeded_store(dir: &tempfile::TempDir) -> JsonStore {
        let mut config = StoreConfig::in_dir(dir.path());
        config.seed_admin = Some(SeedUser {
            email: "admin@example.com".into(),
            name: "Super Admin".into(),
            password_hash: "$argon2id$placeholder".into(),
        });
        JsonStore::open(config).await.unwrap()
    }

    #[tokio::test]
    async fn empty_users_document_gets_seed_admin() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir).await;

        let users = UserRepo::list(&store).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, SEED_ADMIN_ID);

        let again = UserRepo::list(&store).await.unwrap();
        assert_eq!(again, users);
    }

    #[tokio::test]
    async fn find_by_email_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir).await;
        let user = UserRepo::find_by_email(&store, "Admin@Example.com").await.unwrap();
        assert!(user.is_some());
        assert!(UserRepo::find_by_email(&store, "x@y.z").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_password_hash_clears_legacy_salt() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir).await;
        store
            .write(&vec![User {
                id: "1".into(),
                email: "a@b.c".into(),
                password_hash: "legacy".into(),
                salt: Some("s".into()),
                name: "Legacy".into(),
            }])
            .await
            .unwrap();

        let user = UserRepo::set_password_hash(&store, "1", "$argon2id$new".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.salt, None);
        assert_eq!(
            UserRepo::find_by_id(&store, "1").await.unwrap().unwrap().password_hash,
            "$argon2id$new"
        );
        assert!(UserRepo::set_password_hash(&store, "9", "h".into())
            .await
            .unwrap()
            .is_none());
    }
}
