//! Durable JSON document store.
//!
//! One pretty-printed JSON file per [`ResourceKind`] inside the data
//! directory. A missing file is seeded with the kind's default and persisted;
//! any other read failure (I/O, malformed JSON) propagates as a
//! [`StoreError`]. Writes go to a sibling temp file that is renamed over the
//! target, so readers never observe a half-written document.

use std::path::{Path, PathBuf};

use audition_core::user::SeedUser;

use crate::document::Document;
use crate::error::StoreError;
use crate::guard::{KindGuards, KindLock};
use crate::kind::ResourceKind;

/// Filesystem locations and seed data for a [`JsonStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the JSON documents.
    pub data_dir: PathBuf,
    /// Private media directory (answer recordings, merged videos, branding).
    pub uploads_dir: PathBuf,
    /// Account written when the users document is empty.
    pub seed_admin: Option<SeedUser>,
}

impl StoreConfig {
    /// Documents in `data_dir`, media in `data_dir/uploads`, no seed admin.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let uploads_dir = data_dir.join("uploads");
        Self {
            data_dir,
            uploads_dir,
            seed_admin: None,
        }
    }
}

pub struct JsonStore {
    data_dir: PathBuf,
    uploads_dir: PathBuf,
    seed_admin: Option<SeedUser>,
    guards: KindGuards,
}

impl JsonStore {
    /// Open a store, creating the data and upload directories if needed.
    pub async fn open(config: StoreConfig) -> Result<Self, StoreError> {
        for dir in [&config.data_dir, &config.uploads_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }
        tracing::debug!(
            data_dir = %config.data_dir.display(),
            uploads_dir = %config.uploads_dir.display(),
            "Opened JSON store"
        );
        Ok(Self {
            data_dir: config.data_dir,
            uploads_dir: config.uploads_dir,
            seed_admin: config.seed_admin,
            guards: KindGuards::new(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn seed_admin(&self) -> Option<&SeedUser> {
        self.seed_admin.as_ref()
    }

    /// Path of `kind`'s document.
    pub fn path_for(&self, kind: ResourceKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Wait for exclusive access to `kind`.
    pub async fn lock(&self, kind: ResourceKind) -> KindLock<'_> {
        self.guards.acquire(kind).await
    }

    /// Load `D` while holding its kind's lock, seeding it if absent.
    pub async fn load<D: Document>(&self, lock: &KindLock<'_>) -> Result<D, StoreError> {
        debug_assert_eq!(lock.kind(), D::KIND, "store guard does not match document");
        let path = self.path_for(D::KIND);

        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::json(&path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(kind = %D::KIND, path = %path.display(), "Seeding missing document");
                let seed = D::seed();
                self.persist(&path, &seed).await?;
                Ok(seed)
            }
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    /// Replace `D` while holding its kind's lock.
    pub async fn save<D: Document>(&self, lock: &KindLock<'_>, doc: &D) -> Result<(), StoreError> {
        debug_assert_eq!(lock.kind(), D::KIND, "store guard does not match document");
        self.persist(&self.path_for(D::KIND), doc).await
    }

    /// Read the current document for `D`'s kind.
    pub async fn read<D: Document>(&self) -> Result<D, StoreError> {
        let lock = self.lock(D::KIND).await;
        self.load(&lock).await
    }

    /// Replace the document for `D`'s kind.
    pub async fn write<D: Document>(&self, doc: &D) -> Result<(), StoreError> {
        let lock = self.lock(D::KIND).await;
        self.save(&lock, doc).await
    }

    /// Read-modify-write under the kind's guard.
    ///
    /// `f` returns `Some(value)` when it changed the document, which is then
    /// persisted, or `None` to leave the file untouched.
    pub async fn update<D, T, F>(&self, f: F) -> Result<Option<T>, StoreError>
    where
        D: Document,
        F: FnOnce(&mut D) -> Option<T>,
    {
        let lock = self.lock(D::KIND).await;
        let mut doc: D = self.load(&lock).await?;
        let outcome = f(&mut doc);
        if outcome.is_some() {
            self.save(&lock, &doc).await?;
        }
        Ok(outcome)
    }

    /// Whether the data directory is present and writable.
    pub async fn is_healthy(&self) -> bool {
        match tokio::fs::metadata(&self.data_dir).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        }
    }

    async fn persist<D: Document>(&self, path: &Path, doc: &D) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(|e| StoreError::json(path, e))?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::io(&self.data_dir, e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = path.with_file_name(format!(".{file_name}.tmp"));

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use audition_core::form_schema::FormField;
    use audition_core::question::Question;
    use audition_core::site_config::SiteConfig;

    use super::*;

    async fn temp_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(StoreConfig::in_dir(dir.path())).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn missing_document_is_seeded_and_persisted() {
        let (_dir, store) = temp_store().await;
        let schema: Vec<FormField> = store.read().await.unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema[0].id, "name");
        assert!(store.path_for(ResourceKind::FormSchema).exists());
    }

    #[tokio::test]
    async fn write_then_read_returns_equal_document() {
        let (_dir, store) = temp_store().await;

        let questions = vec![Question {
            id: "1".into(),
            text: "Tell us about yourself".into(),
            description: Some("Two minutes".into()),
            time_limit: 120,
        }];
        store.write(&questions).await.unwrap();
        let back: Vec<Question> = store.read().await.unwrap();
        assert_eq!(back, questions);

        let mut terms = SiteConfig::seeded();
        terms.webhook_url = Some("https://hooks.example.com/x".into());
        terms
            .extra
            .insert("accent".into(), serde_json::json!({ "color": "#123456" }));
        store.write(&terms).await.unwrap();
        let back: SiteConfig = store.read().await.unwrap();
        assert_eq!(back, terms);
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() {
        let (_dir, store) = temp_store().await;
        std::fs::write(store.path_for(ResourceKind::Questions), "{ not json").unwrap();
        let result: Result<Vec<Question>, _> = store.read().await;
        assert_matches!(result, Err(StoreError::Json { .. }));
    }

    #[tokio::test]
    async fn update_without_change_does_not_write() {
        let (_dir, store) = temp_store().await;
        let path = store.path_for(ResourceKind::Questions);
        let outcome = store
            .update(|_: &mut Vec<Question>| None::<()>)
            .await
            .unwrap();
        assert!(outcome.is_none());
        // The seed itself is persisted by the load.
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let (dir, store) = temp_store().await;
        store.write(&Vec::<Question>::new()).await.unwrap();
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn store_is_healthy_after_open() {
        let (_dir, store) = temp_store().await;
        assert!(store.is_healthy().await);
    }
}
