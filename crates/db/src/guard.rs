//! Per-kind serialization guard.
//!
//! Each resource kind owns one async mutex. A read-modify-write on a kind's
//! document holds that kind's [`KindLock`] for its whole span, so concurrent
//! writers cannot interleave and lose updates. Kinds are independent: holding
//! the submissions lock never blocks a questions read. No code path holds two
//! kinds' locks at once.
//!
//! The guard is in-memory only. Several processes sharing one data directory
//! are not serialized against each other.

use tokio::sync::{Mutex, MutexGuard};

use crate::kind::ResourceKind;

pub struct KindGuards {
    locks: [Mutex<()>; ResourceKind::ALL.len()],
}

impl KindGuards {
    pub fn new() -> Self {
        Self {
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Wait for exclusive access to `kind`.
    pub async fn acquire(&self, kind: ResourceKind) -> KindLock<'_> {
        let guard = self.locks[kind.index()].lock().await;
        tracing::trace!(%kind, "Acquired store guard");
        KindLock {
            kind,
            _guard: guard,
        }
    }
}

impl Default for KindGuards {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of exclusive access to one resource kind. Released on drop.
pub struct KindLock<'a> {
    kind: ResourceKind,
    _guard: MutexGuard<'a, ()>,
}

impl KindLock<'_> {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_kind_is_exclusive() {
        let guards = KindGuards::new();
        let _held = guards.acquire(ResourceKind::Submissions).await;
        let second = tokio::time::timeout(
            Duration::from_millis(50),
            guards.acquire(ResourceKind::Submissions),
        )
        .await;
        assert!(second.is_err(), "second acquire must wait");
    }

    #[tokio::test]
    async fn different_kinds_do_not_block() {
        let guards = KindGuards::new();
        let _held = guards.acquire(ResourceKind::Submissions).await;
        let other = tokio::time::timeout(
            Duration::from_millis(50),
            guards.acquire(ResourceKind::Questions),
        )
        .await;
        assert!(other.is_ok(), "other kinds must stay available");
        assert_eq!(other.unwrap().kind(), ResourceKind::Questions);
    }
}
