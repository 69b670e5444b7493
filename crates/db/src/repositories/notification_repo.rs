//! Repository for the `notifications.json` log.

use audition_core::notification::{NewNotification, Notification};
use audition_core::types::next_time_id;

use crate::error::StoreError;
use crate::kind::ResourceKind;
use crate::store::JsonStore;

/// Provides the newest-first notification log.
pub struct NotificationRepo;

impl NotificationRepo {
    /// All logged notifications, newest first.
    pub async fn list(store: &JsonStore) -> Result<Vec<Notification>, StoreError> {
        store.read().await
    }

    /// Record a sent notification at the head of the log.
    pub async fn append(
        store: &JsonStore,
        message: NewNotification,
    ) -> Result<Notification, StoreError> {
        let lock = store.lock(ResourceKind::Notifications).await;
        let mut log: Vec<Notification> = store.load(&lock).await?;
        let notification = Notification {
            id: next_time_id(log.iter().map(|n| n.id.as_str())),
            sent_at: chrono::Utc::now(),
            message,
        };
        log.insert(0, notification.clone());
        store.save(&lock, &log).await?;
        Ok(notification)
    }
}
