//! Frame Bridge - work queue and frame clock over the host callback.
//!
//! The host drives execution by invoking one callback per rendered frame.
//! Everything the composition runtime defers lands here and resumes on
//! that callback:
//!
//! - The **work queue** accepts deferred tasks (unbounded; producers never
//!   block). A drain pass runs exactly the tasks present when the pass
//!   starts, in enqueue order - tasks enqueued during the drain wait for
//!   the next host frame, which keeps frame pacing predictable and rules
//!   out unbounded same-frame recursion.
//! - The **frame-start signal** is a one-slot, latest-wins flag marked at
//!   the top of every host callback.
//! - **Frame-clock waiters** are suspended tasks whose only wake condition
//!   is "next host frame started". Each is a cancel token plus a resume
//!   closure; all waiters registered before a frame-start resume with the
//!   same timestamp, the host's microsecond clock converted to
//!   nanoseconds. A canceled waiter never resumes - the token is checked
//!   before resumption.
//!
//! There is no parallelism here, only cooperative interleaving on the host
//! frame thread; work arriving from another thread must cross in through
//! the queue, never by touching composition state directly.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

// =============================================================================
// Types
// =============================================================================

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Cooperative cancellation flag shared between a waiter and its owner.
pub type CancelToken = Rc<Cell<bool>>;

/// Whether a repeating frame task keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTaskControl {
    /// Re-arm for the next host frame.
    Continue,
    /// Stop; the task will not be resumed again.
    Stop,
}

struct FrameWaiter {
    canceled: CancelToken,
    resume: Box<dyn FnOnce(u64)>,
}

// =============================================================================
// Frame Scheduler
// =============================================================================

/// Single-threaded cooperative scheduler backed by the host frame callback.
///
/// Clones share the same queue and waiter registry.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    inner: Rc<FrameInner>,
}

#[derive(Default)]
struct FrameInner {
    queue: RefCell<VecDeque<Task>>,
    frame_started: Cell<bool>,
    waiters: RefCell<Vec<FrameWaiter>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue deferred work; runs during a frame's drain pass.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.inner.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Number of tasks currently queued.
    pub fn pending_tasks(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Number of frame-clock waiters currently suspended.
    pub fn pending_waiters(&self) -> usize {
        self.inner.waiters.borrow().len()
    }

    /// Suspend `resume` until the next frame-start; it receives the frame
    /// timestamp in nanoseconds. Registration after cancellation is
    /// dropped immediately.
    pub fn request_frame(&self, canceled: CancelToken, resume: impl FnOnce(u64) + 'static) {
        if canceled.get() {
            return;
        }
        self.inner.waiters.borrow_mut().push(FrameWaiter {
            canceled,
            resume: Box::new(resume),
        });
    }

    /// Run `task` once per host frame until it returns
    /// [`FrameTaskControl::Stop`] or the token is canceled.
    pub fn frame_task(
        &self,
        canceled: CancelToken,
        mut task: impl FnMut(u64) -> FrameTaskControl + 'static,
    ) {
        let scheduler = self.clone();
        self.request_frame(canceled.clone(), move |nanos| {
            if task(nanos) == FrameTaskControl::Continue {
                scheduler.frame_task(canceled, task);
            }
        });
    }

    /// The host's per-frame entry point.
    ///
    /// `now_usec` is the host monotonic clock reading; the frame clock
    /// promises nanoseconds, so it is converted here once for all waiters.
    pub fn on_frame(&self, now_usec: u64) {
        let frame_nanos = now_usec.saturating_mul(1_000);

        // Mark the frame-start signal: one slot, latest-wins.
        self.inner.frame_started.set(true);

        // Frame-clock waiters consume the signal. Only waiters registered
        // before this frame resume now; a waiter re-arming during
        // resumption waits for the next frame.
        if self.inner.frame_started.replace(false) {
            let waiters = std::mem::take(&mut *self.inner.waiters.borrow_mut());
            for waiter in waiters {
                if waiter.canceled.get() {
                    continue;
                }
                (waiter.resume)(frame_nanos);
            }
        }

        // Drain exactly the tasks present now; later enqueues wait.
        let present = self.inner.queue.borrow().len();
        if present > 0 {
            log::trace!("draining {} deferred tasks", present);
        }
        for _ in 0..present {
            let task = self.inner.queue.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> CancelToken {
        Rc::new(Cell::new(false))
    }

    #[test]
    fn test_drain_runs_in_enqueue_order() {
        let scheduler = FrameScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..4 {
            let order = order.clone();
            scheduler.post(move || order.borrow_mut().push(i));
        }
        scheduler.on_frame(0);
        assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
        assert_eq!(scheduler.pending_tasks(), 0);
    }

    #[test]
    fn test_tasks_enqueued_during_drain_wait_for_next_frame() {
        let scheduler = FrameScheduler::new();
        let runs = Rc::new(Cell::new(0));
        let runs2 = runs.clone();
        let scheduler2 = scheduler.clone();
        scheduler.post(move || {
            runs2.set(runs2.get() + 1);
            let runs3 = runs2.clone();
            scheduler2.post(move || runs3.set(runs3.get() + 1));
        });

        scheduler.on_frame(0);
        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.pending_tasks(), 1);

        scheduler.on_frame(0);
        assert_eq!(runs.get(), 2);
        assert_eq!(scheduler.pending_tasks(), 0);
    }

    #[test]
    fn test_waiters_share_one_frame_timestamp() {
        let scheduler = FrameScheduler::new();
        let stamps = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..3 {
            let stamps = stamps.clone();
            scheduler.request_frame(token(), move |nanos| stamps.borrow_mut().push(nanos));
        }
        // Microseconds convert to nanoseconds once per frame.
        scheduler.on_frame(16_000);
        assert_eq!(*stamps.borrow(), vec![16_000_000, 16_000_000, 16_000_000]);
    }

    #[test]
    fn test_waiter_resumes_once_per_frame() {
        let scheduler = FrameScheduler::new();
        let resumes = Rc::new(Cell::new(0));
        let resumes2 = resumes.clone();
        scheduler.request_frame(token(), move |_| resumes2.set(resumes2.get() + 1));

        scheduler.on_frame(1);
        scheduler.on_frame(2);
        assert_eq!(resumes.get(), 1);
        assert_eq!(scheduler.pending_waiters(), 0);
    }

    #[test]
    fn test_canceled_waiter_never_resumes() {
        let scheduler = FrameScheduler::new();
        let resumed = Rc::new(Cell::new(false));
        let resumed2 = resumed.clone();
        let cancel = token();
        scheduler.request_frame(cancel.clone(), move |_| resumed2.set(true));

        cancel.set(true);
        scheduler.on_frame(0);
        scheduler.on_frame(1);
        assert!(!resumed.get());

        // Registration after cancellation is dropped up front.
        let resumed3 = resumed.clone();
        scheduler.request_frame(cancel, move |_| resumed3.set(true));
        assert_eq!(scheduler.pending_waiters(), 0);
        scheduler.on_frame(2);
        assert!(!resumed.get());
    }

    #[test]
    fn test_frame_task_rearms_until_stopped() {
        let scheduler = FrameScheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let ticks2 = ticks.clone();
        scheduler.frame_task(token(), move |_| {
            ticks2.set(ticks2.get() + 1);
            if ticks2.get() == 3 {
                FrameTaskControl::Stop
            } else {
                FrameTaskControl::Continue
            }
        });

        for i in 0..5 {
            scheduler.on_frame(i);
        }
        assert_eq!(ticks.get(), 3);
        assert_eq!(scheduler.pending_waiters(), 0);
    }

    #[test]
    fn test_frame_task_cancel_between_frames() {
        let scheduler = FrameScheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let ticks2 = ticks.clone();
        let cancel = token();
        scheduler.frame_task(cancel.clone(), move |_| {
            ticks2.set(ticks2.get() + 1);
            FrameTaskControl::Continue
        });

        scheduler.on_frame(0);
        scheduler.on_frame(1);
        cancel.set(true);
        scheduler.on_frame(2);
        scheduler.on_frame(3);
        assert_eq!(ticks.get(), 2);
    }
}
