//! Snapshot Apply Coordinator - one flush per host-thread hop.
//!
//! Watches every reactive state write through the composition's write
//! observer subscription and schedules at most one pending flush onto the
//! frame scheduler, no matter how many writes land between two drains.
//! The pending flag clears at the *start* of the flush task, so writes
//! that happen while the flush runs schedule the next one instead of
//! being lost.
//!
//! The observer is an explicit subscription owned by the composition:
//! installed at start, dropped at teardown. No process-wide hook exists.

use std::cell::Cell;
use std::rc::Rc;

use crate::state::{StateRegistry, WriteObserverHandle};

use super::frame::FrameScheduler;

// =============================================================================
// Apply Coordinator
// =============================================================================

/// Coalesces state writes into single scheduled flushes.
pub struct ApplyCoordinator {
    pending: Rc<Cell<bool>>,
    handle: Option<WriteObserverHandle>,
}

impl ApplyCoordinator {
    /// Subscribe to `registry` writes and schedule `on_flush` through
    /// `scheduler`, at most once per hop.
    pub fn install(
        registry: &StateRegistry,
        scheduler: &FrameScheduler,
        on_flush: impl Fn() + 'static,
    ) -> Self {
        let pending = Rc::new(Cell::new(false));
        let on_flush = Rc::new(on_flush);
        let observer = {
            let pending = pending.clone();
            let scheduler = scheduler.clone();
            move |signal_id| {
                if pending.get() {
                    return;
                }
                pending.set(true);
                log::trace!("write to signal {} scheduled a flush", signal_id);
                let pending = pending.clone();
                let on_flush = on_flush.clone();
                scheduler.post(move || {
                    pending.set(false);
                    on_flush();
                });
            }
        };
        let handle = registry.register_write_observer(observer);
        Self {
            pending,
            handle: Some(handle),
        }
    }

    /// True while a flush is scheduled but has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Drop the write observer subscription; no further flushes schedule.
    pub fn uninstall(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.dispose();
        }
    }
}
