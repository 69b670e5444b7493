//! Repository for the `terms.json` site configuration document.

use audition_core::site_config::SiteConfig;

use crate::error::StoreError;
use crate::store::JsonStore;

pub struct TermsRepo;

impl TermsRepo {
    pub async fn get(store: &JsonStore) -> Result<SiteConfig, StoreError> {
        store.read().await
    }

    /// Replace the whole configuration.
    pub async fn replace(store: &JsonStore, config: &SiteConfig) -> Result<(), StoreError> {
        store.write(config).await
    }
}
