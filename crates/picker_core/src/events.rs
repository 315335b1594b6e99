//! Named-event notification channel
//!
//! Components broadcast events such as "image removed" without knowing who
//! listens. A `Subscription` guard removes its listener when cancelled or dropped.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Broadcast when an image is deleted elsewhere in the application.
/// Payload: the image `idAsUrl`.
pub const IMAGE_REMOVED: &str = "image:removed";

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    listeners: Mutex<HashMap<String, Vec<(u64, Listener)>>>,
    next_id: AtomicU64,
}

/// Event channel handed to components at construction
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`
    pub fn subscribe<F>(&self, event: &str, listener: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(listener)));

        tracing::debug!("Listener {} subscribed to {}", id, event);
        Subscription {
            bus: Arc::downgrade(&self.inner),
            event: event.to_string(),
            id,
        }
    }

    /// Deliver `payload` to every listener of `event`; returns how many were called
    pub fn emit(&self, event: &str, payload: &str) -> usize {
        // Listeners run without the lock held so they may use the bus themselves
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .get(event)
            .map(|list| list.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default();

        for listener in &listeners {
            listener(payload);
        }
        listeners.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .listeners
            .lock()
            .get(event)
            .map_or(0, |list| list.len())
    }
}

/// Active registration on an `EventBus`
#[must_use = "dropping a subscription unsubscribes it"]
pub struct Subscription {
    bus: Weak<BusInner>,
    event: String,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Remove the listener now
    pub fn cancel(self) {
        // Drop does the work
    }

    fn remove(&self) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };

        let mut listeners = bus.listeners.lock();
        if let Some(list) = listeners.get_mut(&self.event) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                listeners.remove(&self.event);
            }
        }
        tracing::debug!("Listener {} unsubscribed from {}", self.id, self.event);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_emit_reaches_listeners() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        let _sub = bus.subscribe(IMAGE_REMOVED, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.emit(IMAGE_REMOVED, "img-1"), 1);
        assert_eq!(bus.emit("image:added", "img-1"), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_and_drop_unsubscribe() {
        let bus = EventBus::new();
        let first = bus.subscribe(IMAGE_REMOVED, |_| {});
        let second = bus.subscribe(IMAGE_REMOVED, |_| {});
        assert_eq!(bus.listener_count(IMAGE_REMOVED), 2);

        first.cancel();
        assert_eq!(bus.listener_count(IMAGE_REMOVED), 1);

        drop(second);
        assert_eq!(bus.listener_count(IMAGE_REMOVED), 0);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus = EventBus::new();
        let sub = bus.subscribe(IMAGE_REMOVED, |_| {});
        drop(bus);
        drop(sub);
    }
}
