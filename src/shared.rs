//! Shared-state seam: the collaborative map peers exchange views through.
//!
//! DESIGN
//! ======
//! The replication protocol lives outside this crate. The sync layer only
//! needs `get`, `set`, and key observation on one shared map, captured by
//! the [`SharedState`] trait. [`MemoryMap`] is an in-process implementation
//! several peers can hold through `Arc`, which is what the demo and the
//! tests run against.
//!
//! Observers take no arguments; they re-read the map when they run.
//! `MemoryMap` notifies them synchronously from `set`, after releasing its
//! lock, so a callback may call back into the map.

#[cfg(test)]
#[path = "shared_test.rs"]
mod shared_test;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::debug;

/// The one key the sync layer reads and writes.
pub const VIEW_MATRIX_KEY: &str = "view_matrix";

pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum SharedStateError {
    #[error("shared state is offline")]
    Offline,
    #[error("failed to encode shared value: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait SharedState: Send + Sync {
    /// Current value under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write `value` under `key`. Best-effort: no acknowledgement, no retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the write could not be handed to the replication layer.
    fn set(&self, key: &str, value: Value) -> Result<(), SharedStateError>;

    /// Run `callback` whenever `key` changes.
    fn observe(&self, key: &str, callback: ChangeCallback) -> SubscriptionId;

    /// Stop a subscription. Returns `false` if it was not active.
    fn unobserve(&self, id: SubscriptionId) -> bool;
}

// =============================================================================
// MEMORY MAP
// =============================================================================

struct Observer {
    id: SubscriptionId,
    key: String,
    callback: ChangeCallback,
}

#[derive(Default)]
struct MapInner {
    values: HashMap<String, Value>,
    observers: Vec<Observer>,
}

/// In-process shared map. Every holder of the same `Arc<MemoryMap>` sees
/// every write.
#[derive(Default)]
pub struct MemoryMap {
    inner: Mutex<MapInner>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl MemoryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a dropped connection: writes fail until set back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    #[must_use]
    pub fn observer_count(&self, key: &str) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.observers.iter().filter(|o| o.key == key).count()
    }
}

impl SharedState for MemoryMap {
    fn get(&self, key: &str) -> Option<Value> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.values.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SharedStateError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SharedStateError::Offline);
        }
        let callbacks: Vec<ChangeCallback> = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.values.insert(key.to_owned(), value);
            inner
                .observers
                .iter()
                .filter(|o| o.key == key)
                .map(|o| Arc::clone(&o.callback))
                .collect()
        };
        debug!(key, observers = callbacks.len(), "memory map: set");
        for callback in callbacks {
            callback();
        }
        Ok(())
    }

    fn observe(&self, key: &str, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.observers.push(Observer { id, key: key.to_owned(), callback });
        id
    }

    fn unobserve(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = inner.observers.len();
        inner.observers.retain(|o| o.id != id);
        inner.observers.len() != before
    }
}

// =============================================================================
// SWITCHABLE SUBSCRIPTION
// =============================================================================

/// A key observation that can be switched off and back on, keeping its
/// callback across the gap. Changes made while off are not replayed.
pub struct SwitchableSubscription {
    shared: Arc<dyn SharedState>,
    key: String,
    callback: ChangeCallback,
    active: Mutex<Option<SubscriptionId>>,
}

impl SwitchableSubscription {
    /// Subscribe immediately.
    #[must_use]
    pub fn new(shared: Arc<dyn SharedState>, key: &str, callback: ChangeCallback) -> Self {
        let id = shared.observe(key, Arc::clone(&callback));
        Self { shared, key: key.to_owned(), callback, active: Mutex::new(Some(id)) }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn turn_off(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = active.take() {
            self.shared.unobserve(id);
        }
    }

    pub fn turn_on(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.is_none() {
            *active = Some(self.shared.observe(&self.key, Arc::clone(&self.callback)));
        }
    }
}

impl Drop for SwitchableSubscription {
    fn drop(&mut self) {
        self.turn_off();
    }
}
