//! Lifecycle Controller - composition sessions bound to host tree nodes.
//!
//! [`start_tree_composition`] is the declared-tree entry point: it takes
//! an anchoring, tree-resident host node and a declarative content block,
//! starts one composition, and runs the initial pass synchronously. From
//! then on the session lives entirely off the host's frame callback
//! ([`Composition::process`]): state writes schedule a flush through the
//! apply coordinator, the flush recomposes, and the pass applies.
//!
//! Teardown has exactly one trigger - the anchor node leaving the host
//! tree. It cancels outstanding frame-clock work, runs every retained
//! cleanup synchronously (children first), releases the child nodes the
//! composition created, and drops the write-observer subscription. There
//! is deliberately no manual dispose API, and redundant exit signals are
//! idempotent.
//!
//! A panic inside declared content terminates the session the same way:
//! nothing from the failed pass is applied, teardown runs, then the
//! unwind resumes to the host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::engine::applier::NodeApplier;
use crate::engine::composer::{Composer, Group, retire_group_into};
use crate::error::{CompositionError, Result};
use crate::host::{NodeRef, SceneHost, SceneNode};
use crate::state::StateRegistry;

use super::apply::ApplyCoordinator;
use super::frame::{CancelToken, FrameScheduler};

// =============================================================================
// Entry Point
// =============================================================================

/// Start a composition anchored at `root`, which must be inside the host
/// tree. The initial pass runs before this returns.
pub fn start_tree_composition(
    host: Rc<dyn SceneHost>,
    root: NodeRef,
    content: impl FnMut(&mut Composer) + 'static,
) -> Result<Composition> {
    if !root.is_inside_tree() {
        return Err(CompositionError::NodeOutsideTree);
    }
    log::debug!("starting composition on node {}", root.id());

    let inner = Rc::new(CompositionInner {
        host,
        root: root.clone(),
        scheduler: FrameScheduler::new(),
        registry: StateRegistry::new(),
        content: RefCell::new(Box::new(content)),
        tree: RefCell::new(None),
        canceled: Rc::new(Cell::new(false)),
        disposed: Cell::new(false),
        coordinator: RefCell::new(None),
    });

    // State writes coalesce into one recompose per scheduler hop.
    let coordinator = {
        let weak = Rc::downgrade(&inner);
        ApplyCoordinator::install(&inner.registry, &inner.scheduler, move || {
            if let Some(inner) = weak.upgrade() {
                CompositionInner::recompose(&inner);
            }
        })
    };
    *inner.coordinator.borrow_mut() = Some(coordinator);

    // The single teardown path: the anchor leaves the host tree. The node
    // holds the session alive for as long as it can still trigger this.
    {
        let inner = inner.clone();
        root.connect_tree_exiting(Rc::new(move || {
            CompositionInner::dispose(&inner, Vec::new());
        }));
    }

    CompositionInner::recompose(&inner);
    Ok(Composition { inner })
}

// =============================================================================
// Composition
// =============================================================================

/// Handle wiring one composition session to the host frame callback.
///
/// Dropping the handle does not tear the session down; only the anchor
/// node leaving the tree does.
pub struct Composition {
    inner: Rc<CompositionInner>,
}

impl Composition {
    /// The host's per-frame callback. Resumes frame-clock waiters with the
    /// host's current monotonic time and drains deferred work, which is
    /// where pending flushes recompose and apply.
    pub fn process(&self, _delta: f64) {
        let now_usec = self.inner.host.ticks_usec();
        self.inner.scheduler.on_frame(now_usec);
    }

    /// False once the anchor left the tree (or a pass fault tore down).
    pub fn is_active(&self) -> bool {
        !self.inner.disposed.get()
    }

    /// The anchoring node this composition renders under.
    pub fn root(&self) -> &NodeRef {
        &self.inner.root
    }
}

struct CompositionInner {
    host: Rc<dyn SceneHost>,
    root: NodeRef,
    scheduler: FrameScheduler,
    registry: StateRegistry,
    content: RefCell<Box<dyn FnMut(&mut Composer)>>,
    tree: RefCell<Option<Group>>,
    canceled: CancelToken,
    disposed: Cell<bool>,
    coordinator: RefCell<Option<ApplyCoordinator>>,
}

impl CompositionInner {
    /// Run one recomposition pass and apply it.
    fn recompose(inner: &Rc<Self>) {
        if inner.disposed.get() {
            return;
        }
        let prev = inner.tree.borrow_mut().take();
        let composer = Composer::new(
            inner.host.clone(),
            inner.registry.clone(),
            inner.scheduler.clone(),
            inner.canceled.clone(),
        );
        let outcome = {
            let mut content = inner.content.borrow_mut();
            composer.run(prev, inner.root.clone(), &mut **content)
        };
        match outcome {
            Ok(output) => {
                let tree = output.apply(&inner.root);
                *inner.tree.borrow_mut() = Some(tree);
            }
            Err(fault) => {
                log::debug!("composition pass faulted; tearing down node {}", inner.root.id());
                Self::dispose(inner, fault.cleanups);
                std::panic::resume_unwind(fault.payload);
            }
        }
    }

    /// Tear the session down: idempotent, synchronous, children first.
    fn dispose(inner: &Rc<Self>, mut cleanups: Vec<Box<dyn FnOnce()>>) {
        if inner.disposed.replace(true) {
            return;
        }
        log::debug!("disposing composition on node {}", inner.root.id());
        inner.canceled.set(true);

        if let Some(tree) = inner.tree.borrow_mut().take() {
            retire_group_into(tree, &mut cleanups);
        }
        for cleanup in cleanups {
            cleanup();
        }

        // Release every child node the composition created.
        NodeApplier::new(inner.root.clone()).clear();

        if let Some(coordinator) = inner.coordinator.borrow_mut().take() {
            coordinator.uninstall();
        }
    }
}
