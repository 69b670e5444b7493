//! Per-submission merge locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// In-process map of async mutexes keyed by submission id.
///
/// A second merge (or merged-video delete) for the same submission waits for
/// the first to finish; different submissions proceed in parallel.
#[derive(Default)]
pub struct MergeLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl MergeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive merge access to `submission_id`.
    pub async fn acquire(&self, submission_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // Drop entries nobody holds or waits on.
            map.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(
                map.entry(submission_id.to_string())
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Number of submissions with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
