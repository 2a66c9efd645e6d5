//! Reactive State - signal cells and the write-observer surface.
//!
//! Every composition owns one [`StateRegistry`]; the signals a declared
//! content block remembers are created in it. Writing a signal notifies the
//! registry's write observers synchronously - that is the hook the snapshot
//! apply coordinator uses to schedule a flush.
//!
//! The observer surface is an explicit subscription object
//! ([`WriteObserverHandle`]): registered when a composition starts,
//! unregistered at teardown. There is deliberately no process-wide hook.
//!
//! Everything here is single-threaded cooperative state; cells are Rc-based
//! and never cross threads.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

// =============================================================================
// Identifiers
// =============================================================================

/// Identity of a signal within its registry, for observer diagnostics.
pub type SignalId = u64;

type ObserverId = u64;
type WriteObserver = Rc<dyn Fn(SignalId)>;

// =============================================================================
// State Registry
// =============================================================================

/// Per-composition home of reactive state.
#[derive(Clone, Default)]
pub struct StateRegistry {
    inner: Rc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    next_signal_id: Cell<u64>,
    next_observer_id: Cell<u64>,
    observers: RefCell<Vec<(ObserverId, WriteObserver)>>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signal cell holding `initial`.
    pub fn signal<T>(&self, initial: T) -> Signal<T> {
        let id = self.inner.next_signal_id.get();
        self.inner.next_signal_id.set(id + 1);
        Signal {
            id,
            value: Rc::new(RefCell::new(initial)),
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Register an observer fired synchronously on every signal write.
    ///
    /// Returns a subscription handle; the observer stays registered until
    /// the handle is disposed (or dropped).
    pub fn register_write_observer(
        &self,
        observer: impl Fn(SignalId) + 'static,
    ) -> WriteObserverHandle {
        let id = self.inner.next_observer_id.get();
        self.inner.next_observer_id.set(id + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        WriteObserverHandle {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    #[cfg(test)]
    fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }
}

impl RegistryInner {
    fn notify_write(&self, id: SignalId) {
        // Snapshot first: an observer may register or unregister observers.
        let observers: Vec<WriteObserver> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, o)| o.clone())
            .collect();
        for observer in observers {
            observer(id);
        }
    }
}

// =============================================================================
// Write Observer Handle
// =============================================================================

/// Subscription to write notifications; unregisters on dispose/drop.
pub struct WriteObserverHandle {
    id: ObserverId,
    registry: Weak<RegistryInner>,
}

impl WriteObserverHandle {
    /// Unregister the observer.
    pub fn dispose(self) {}
}

impl Drop for WriteObserverHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.observers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

// =============================================================================
// Signal
// =============================================================================

/// Mutable reactive cell. Cloning shares the same underlying value.
pub struct Signal<T> {
    id: SignalId,
    value: Rc<RefCell<T>>,
    registry: Weak<RegistryInner>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: self.value.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<T> Signal<T> {
    /// Registry-local identity of this cell.
    pub fn id(&self) -> SignalId {
        self.id
    }

    /// Read through a closure without cloning the value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value and notify write observers.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate the value in place and notify write observers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.value.borrow_mut());
        self.notify();
    }

    fn notify(&self) {
        log::trace!("signal {} written", self.id);
        if let Some(registry) = self.registry.upgrade() {
            registry.notify_write(self.id);
        }
    }
}

impl<T: Clone> Signal<T> {
    /// Current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}
