//! Listener registry for decoded incoming messages.
//!
//! Registrations are kept in a list, not a set: subscribing the same
//! closure twice yields two independent registrations, and each
//! [`Subscription`] removes only its own.
//!
//! The list is copy-on-write. Dispatch clones the current snapshot and
//! runs listeners without holding the lock, so a listener may subscribe
//! or unsubscribe from inside its own callback. Changes take effect from
//! the next message.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::warn;

/// Callback invoked with every decoded message.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Identity of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Entries = Arc<Vec<(ListenerId, Listener)>>;

#[derive(Default)]
struct RegistryInner {
    entries: RwLock<Entries>,
    next_id: AtomicU64,
}

/// Ordered, thread-safe registry of message listeners.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<RegistryInner>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. Returns the disposer for this registration.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.subscribe_arc(Arc::new(listener))
    }

    /// Append an already shared listener.
    pub fn subscribe_arc(&self, listener: Listener) -> Subscription {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.inner.entries.write();
        let mut next = Vec::with_capacity(entries.len() + 1);
        next.extend(entries.iter().cloned());
        next.push((id, listener));
        *entries = Arc::new(next);

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Remove one registration. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        remove(&self.inner, id)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        *self.inner.entries.write() = Arc::new(Vec::new());
    }

    /// Invoke every listener in registration order.
    ///
    /// A panicking listener is logged and skipped; the rest still run.
    /// Returns how many listeners panicked.
    pub fn dispatch(&self, message: &Value) -> usize {
        let snapshot: Entries = Arc::clone(&self.inner.entries.read());
        let mut failures = 0;

        for (id, listener) in snapshot.iter() {
            if catch_unwind(AssertUnwindSafe(|| listener(message))).is_err() {
                warn!("Listener {:?} panicked while handling message", id);
                failures += 1;
            }
        }

        failures
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

fn remove(inner: &RegistryInner, id: ListenerId) -> bool {
    let mut entries = inner.entries.write();
    if !entries.iter().any(|(existing, _)| *existing == id) {
        return false;
    }
    let next: Vec<_> = entries
        .iter()
        .filter(|(existing, _)| *existing != id)
        .cloned()
        .collect();
    *entries = Arc::new(next);
    true
}

/// Disposer returned by `subscribe`.
///
/// Dropping it does NOT unsubscribe; call [`Subscription::unsubscribe`].
/// It holds only a weak reference, so it never keeps the registry alive.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RegistryInner>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove exactly this registration. Safe to call more than once.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(inner) => remove(&inner, self.id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|inner| inner.entries.read().iter().any(|(id, _)| *id == self.id))
            .unwrap_or(false)
    }
}
