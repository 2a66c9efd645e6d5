//! Reactive Pipeline - scheduling, coalescing and lifecycle.
//!
//! Connects the reactive state layer to the host's per-frame callback:
//!
//! ```text
//! state write → apply coordinator → work queue → host frame → recompose → apply
//! ```
//!
//! ## Data Flow
//!
//! 1. **frame** - work queue, frame-start signal and frame-clock waiters,
//!    all driven by the single host callback
//! 2. **apply** - write observer scheduling at most one flush per hop
//! 3. **lifecycle** - composition sessions: entry point, per-frame hook,
//!    teardown bound to the anchor node's tree exit
//!
//! Everything runs cooperatively on the host frame thread; the work queue
//! is the only way in from outside it.

pub mod apply;
pub mod frame;
pub mod lifecycle;

pub use apply::ApplyCoordinator;
pub use frame::{CancelToken, FrameScheduler, FrameTaskControl, Task};
pub use lifecycle::{Composition, start_tree_composition};
