//! Listener registry for drag results.
//!
//! The controller emits each completed move here; the data owner subscribes
//! and reorders its own records.
//!
//! ## Subscriptions
//!
//! `add_listener` returns a [`Subscription`]. Dropping it (or calling
//! `unsubscribe`) removes the listener. Call `detach` to keep the listener
//! for the lifetime of the channel.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dnd_table_core::MoveResult;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ListenerList<T> {
    next_id: AtomicU64,
    entries: RwLock<Vec<(u64, Listener<T>)>>,
}

impl<T> ListenerList<T> {
    fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.write();
        match entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(pos) => {
                entries.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// A broadcast point for values of type `T`.
///
/// Listeners run synchronously, in registration order, on the emitting thread.
pub struct EventChannel<T> {
    listeners: Arc<ListenerList<T>>,
}

/// The channel a drag surface emits its moves on.
pub type MoveEvents = EventChannel<MoveResult>;

impl<T: 'static> EventChannel<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(ListenerList {
                next_id: AtomicU64::new(0),
                entries: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register a listener.
    pub fn add_listener(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.entries.write().push((id, Arc::new(callback)));
        tracing::debug!("Added listener (id: {})", id);

        let weak: Weak<ListenerList<T>> = Arc::downgrade(&self.listeners);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    if listeners.remove(id) {
                        tracing::debug!("Removed listener (id: {})", id);
                    }
                }
            })),
        }
    }

    /// Deliver `value` to every listener.
    ///
    /// Listeners may subscribe or unsubscribe while being called; changes
    /// take effect from the next emit.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .entries
            .read()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in snapshot {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.entries.read().len()
    }
}

impl<T: 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription removes the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }

    /// Keep the listener registered until the channel is dropped.
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<MoveResult>>>, impl Fn(&MoveResult) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |m: &MoveResult| sink.lock().push(*m))
    }

    fn sample_move() -> MoveResult {
        MoveResult {
            from_index: 3,
            to_index: 1,
        }
    }

    #[test]
    fn test_emit_reaches_listener() {
        let events = MoveEvents::new();
        let (seen, listener) = recorder();
        let _sub = events.add_listener(listener);

        events.emit(&sample_move());
        assert_eq!(*seen.lock(), vec![sample_move()]);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let events = EventChannel::<u32>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        let _a = events.add_listener(move |_| first.lock().push("first"));
        let second = order.clone();
        let _b = events.add_listener(move |_| second.lock().push("second"));

        events.emit(&0);
        assert_eq!(*order.lock(), ["first", "second"]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let events = MoveEvents::new();
        let (seen, listener) = recorder();
        let sub = events.add_listener(listener);
        assert_eq!(events.listener_count(), 1);

        drop(sub);
        assert_eq!(events.listener_count(), 0);

        events.emit(&sample_move());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_unsubscribe_only_removes_own_listener() {
        let events = MoveEvents::new();
        let (seen_a, a) = recorder();
        let (seen_b, b) = recorder();
        let sub_a = events.add_listener(a);
        let _sub_b = events.add_listener(b);

        sub_a.unsubscribe();
        events.emit(&sample_move());

        assert!(seen_a.lock().is_empty());
        assert_eq!(seen_b.lock().len(), 1);
    }

    #[test]
    fn test_detach_keeps_listener() {
        let events = MoveEvents::new();
        let (seen, listener) = recorder();
        events.add_listener(listener).detach();

        events.emit(&sample_move());
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(events.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_channel() {
        let events = MoveEvents::new();
        let (_seen, listener) = recorder();
        let sub = events.add_listener(listener);
        drop(events);
        // Must not panic
        drop(sub);
    }
}
