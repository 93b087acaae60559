//! Signal-based change notification.
//!
//! Signals are the notification backbone of the shell: the settings store
//! announces key changes, the translator announces language switches, and the
//! model types announce structural changes through [`crate::model::ModelSignals`].
//!
//! Delivery is direct: slots run synchronously, in connection order, on the
//! emitting call stack. That is the contract the settings model is written
//! against, so there is no queued or cross-thread delivery here.
//!
//! # Example
//!
//! ```
//! use horizon_appshell::signal::Signal;
//!
//! let changed = Signal::<String>::new();
//! let id = changed.connect(|key| println!("changed: {key}"));
//! changed.emit("General/timeout".to_string());
//! changed.disconnect(id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle identifying a single signal connection.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync + 'static>;

struct SignalInner<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

/// A typed, multi-receiver notification channel.
///
/// Cloning a `Signal` clones a handle to the same connection list, so a
/// struct can expose its signal by value while emitting through a private
/// copy.
pub struct Signal<Args = ()> {
    inner: Arc<SignalInner<Args>>,
}

impl<Args> Clone for Signal<Args> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Creates a signal with no connections.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                slots: Mutex::new(SlotMap::with_key()),
                blocked: AtomicBool::new(false),
            }),
        }
    }

    /// Connects a slot and returns its connection handle.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.inner.slots.lock().insert(Arc::new(slot))
    }

    /// Removes a connection. Returns `false` if the handle was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.inner.slots.lock().remove(id).is_some()
    }

    /// Removes every connection.
    pub fn disconnect_all(&self) {
        self.inner.slots.lock().clear();
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.inner.slots.lock().len()
    }

    /// Blocks or unblocks emission. Returns the previous state.
    ///
    /// While blocked, `emit` is a no-op; connections are kept.
    pub fn set_blocked(&self, blocked: bool) -> bool {
        self.inner.blocked.swap(blocked, Ordering::SeqCst)
    }

    /// Whether emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.inner.blocked.load(Ordering::SeqCst)
    }

    /// Invokes every connected slot with `args`, in connection order.
    ///
    /// Slots are collected before invocation so a slot may connect or
    /// disconnect without deadlocking; such changes take effect on the next
    /// emission.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            return;
        }
        let slots: Vec<Slot<Args>> = self.inner.slots.lock().values().cloned().collect();
        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

/// Disconnects a connection when dropped.
///
/// Useful for observers whose lifetime is shorter than the signal's owner.
pub struct ConnectionGuard<Args: 'static> {
    signal: Signal<Args>,
    id: Option<ConnectionId>,
}

impl<Args> ConnectionGuard<Args> {
    /// Wraps an existing connection so it is severed on drop.
    pub fn new(signal: &Signal<Args>, id: ConnectionId) -> Self {
        Self {
            signal: signal.clone(),
            id: Some(id),
        }
    }

    /// Releases the guard without disconnecting.
    pub fn forget(mut self) -> Option<ConnectionId> {
        self.id.take()
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn test_emit_reaches_all_slots() {
        let signal = Signal::<i32>::new();
        let seen = Arc::new(StdMutex::new(Vec::new()));

        let a = Arc::clone(&seen);
        signal.connect(move |v| a.lock().unwrap().push(*v));
        let b = Arc::clone(&seen);
        signal.connect(move |v| b.lock().unwrap().push(*v * 10));

        signal.emit(4);
        assert_eq!(*seen.lock().unwrap(), vec![4, 40]);
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let signal = Signal::<()>::new();
        let count = Arc::new(StdMutex::new(0));

        let c = Arc::clone(&count);
        let id = signal.connect(move |_| *c.lock().unwrap() += 1);

        signal.emit(());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(());

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_blocked_signal_drops_emissions() {
        let signal = Signal::<()>::new();
        let count = Arc::new(StdMutex::new(0));

        let c = Arc::clone(&count);
        signal.connect(move |_| *c.lock().unwrap() += 1);

        assert!(!signal.set_blocked(true));
        signal.emit(());
        assert!(signal.set_blocked(false));
        signal.emit(());

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(signal.connection_count(), 1);
    }

    #[test]
    fn test_slot_may_reconnect_during_emit() {
        let signal = Signal::<()>::new();
        let count = Arc::new(StdMutex::new(0));

        let outer = signal.clone();
        let c = Arc::clone(&count);
        signal.connect(move |_| {
            let c2 = Arc::clone(&c);
            outer.connect(move |_| *c2.lock().unwrap() += 1);
        });

        signal.emit(());
        assert_eq!(*count.lock().unwrap(), 0);
        signal.emit(());
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| {});
        {
            let _guard = ConnectionGuard::new(&signal, id);
            assert_eq!(signal.connection_count(), 1);
        }
        assert_eq!(signal.connection_count(), 0);
    }
}
