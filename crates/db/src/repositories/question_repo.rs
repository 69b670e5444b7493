//! Repository for the `questions.json` document.

use audition_core::ordering::move_item;
use audition_core::question::Question;

use crate::error::StoreError;
use crate::kind::ResourceKind;
use crate::store::JsonStore;

/// Provides list/replace/reorder for interview questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// All questions in display order.
    pub async fn list(store: &JsonStore) -> Result<Vec<Question>, StoreError> {
        store.read().await
    }

    /// Replace the whole list. Callers validate first.
    pub async fn replace_all(store: &JsonStore, questions: &[Question]) -> Result<(), StoreError> {
        store.write(&questions.to_vec()).await
    }

    /// Swap the question at `index` with its neighbour in `direction`.
    ///
    /// Returns the resulting list. Out-of-range moves leave the document
    /// untouched and return it unchanged.
    pub async fn move_question(
        store: &JsonStore,
        index: usize,
        direction: i32,
    ) -> Result<Vec<Question>, StoreError> {
        let lock = store.lock(ResourceKind::Questions).await;
        let mut questions: Vec<Question> = store.load(&lock).await?;
        if move_item(&mut questions, index, direction) {
            store.save(&lock, &questions).await?;
        }
        Ok(questions)
    }
}
