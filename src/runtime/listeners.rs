//! Outside-pointer registration.
//!
//! A widget that opens a panel acquires an [`OutsideListener`] and keeps it for
//! as long as the panel is open. The host routes pointer presses that miss the
//! widget only to ids currently registered here. Dropping the guard (panel
//! closed by any path, widget dropped) removes the registration.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Registry = Mutex<HashMap<String, usize>>;

#[derive(Debug, Clone, Default)]
pub struct PointerListeners {
    inner: Arc<Registry>,
}

impl PointerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: impl Into<String>) -> OutsideListener {
        let id = id.into();
        *lock(&self.inner).entry(id.clone()).or_insert(0) += 1;
        tracing::trace!(listener = %id, "outside-pointer listener attached");
        OutsideListener {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        lock(&self.inner).contains_key(id)
    }

    /// Registered ids, sorted so routing order is stable.
    pub fn active_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.inner).keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration guard; deregisters on drop.
#[derive(Debug)]
pub struct OutsideListener {
    id: String,
    registry: Weak<Registry>,
}

impl OutsideListener {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for OutsideListener {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut map = lock(&registry);
        if let Some(count) = map.get_mut(&self.id) {
            *count -= 1;
            if *count == 0 {
                map.remove(&self.id);
            }
        }
        tracing::trace!(listener = %self.id, "outside-pointer listener detached");
    }
}

fn lock(registry: &Registry) -> MutexGuard<'_, HashMap<String, usize>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
