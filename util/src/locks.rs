//! Per-key async mutexes.
//!
//! Heartbeats and command acknowledgements for the same student must not
//! interleave their read-then-write steps. `KeyedLocks` hands out one
//! `tokio::sync::Mutex` per student id; different students never contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct KeyedLocks {
    inner: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

/// Exclusive access to one key. Dropping it releases the lock and removes
/// the key's entry when nobody else holds or awaits it.
pub struct KeyedGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: i64,
    map: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl Drop for KeyedGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters clone the Arc under the shard lock, so a count of one
        // means only the map still references the mutex.
        self.map
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`. The lock is released when the
    /// returned guard is dropped.
    pub async fn lock(&self, key: i64) -> KeyedGuard {
        let mutex = self
            .inner
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        KeyedGuard {
            guard: Some(mutex.lock_owned().await),
            key,
            map: Arc::clone(&self.inner),
        }
    }

    /// Number of keys currently locked or awaited.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
