//! Repository for the `form-schema.json` document.

use audition_core::form_schema::FormField;
use audition_core::ordering::move_item;

use crate::error::StoreError;
use crate::kind::ResourceKind;
use crate::store::JsonStore;

/// Provides list/replace/reorder for the candidate intake form.
pub struct FormSchemaRepo;

impl FormSchemaRepo {
    pub async fn list(store: &JsonStore) -> Result<Vec<FormField>, StoreError> {
        store.read().await
    }

    /// Replace the whole schema. Callers validate first.
    pub async fn replace_all(store: &JsonStore, fields: &[FormField]) -> Result<(), StoreError> {
        store.write(&fields.to_vec()).await
    }

    /// Swap the field at `index` with its neighbour in `direction`.
    pub async fn move_field(
        store: &JsonStore,
        index: usize,
        direction: i32,
    ) -> Result<Vec<FormField>, StoreError> {
        let lock = store.lock(ResourceKind::FormSchema).await;
        let mut fields: Vec<FormField> = store.load(&lock).await?;
        if move_item(&mut fields, index, direction) {
            store.save(&lock, &fields).await?;
        }
        Ok(fields)
    }
}
