//! Host Scene Surface - the external engine this crate composes against.
//!
//! The host owns the live node tree and drives execution through a single
//! per-frame callback. This module defines the narrow surface the bridge
//! consumes:
//!
//! - [`SceneNode`] - one retained tree element: ordered children, membership
//!   query, enter/exit signals, and a uniform property write.
//! - [`SceneHost`] - host services: the node factory and the monotonic clock.
//!
//! The tree editor never owns nodes; it only directs these mutation
//! operations. Node identity is host-assigned ([`SceneNode::id`]) and is the
//! only thing reconciliation compares.
//!
//! [`memory`] ships an in-memory implementation used by the test suite and
//! by embedders running without a live engine.

use std::any::Any;
use std::rc::Rc;

use crate::types::Value;

pub mod memory;

pub use memory::MemoryHost;

// =============================================================================
// Node Handle
// =============================================================================

/// Shared handle to a host node.
///
/// Rc because the composition, the retained group tree and the host child
/// lists all refer to the same element; the host keeps ownership of the
/// underlying object.
pub type NodeRef = Rc<dyn SceneNode>;

/// Callback connected to a host signal. Rc so the same callback can be
/// invoked across many emissions.
pub type SignalCallback = Rc<dyn Fn()>;

/// True if two handles refer to the same host node.
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    a.id() == b.id()
}

// =============================================================================
// Scene Node
// =============================================================================

/// One element of the host's retained tree.
///
/// Methods take `&self`: hosts hand out shared handles and mutate through
/// interior state, and everything runs on the single frame thread anyway.
///
/// Index arguments are produced by the reconciliation engine and assumed
/// valid; implementations should treat out-of-range access as a programming
/// error and panic rather than silently no-op, since silent continuation
/// corrupts tree ordering invisibly.
pub trait SceneNode {
    /// Host-assigned identity, stable for the node's lifetime.
    fn id(&self) -> u64;

    /// Host node type name (the factory kind this node was created with).
    fn kind(&self) -> &str;

    /// Number of children.
    fn child_count(&self) -> usize;

    /// Child at `index`. Panics when out of range.
    fn child_at(&self, index: usize) -> NodeRef;

    /// Append `child` at the end of the child list.
    fn add_child(&self, child: &NodeRef);

    /// Remove `child` from the child list, matched by identity.
    fn remove_child(&self, child: &NodeRef);

    /// Reorder `child` so it occupies `to_index` among its siblings.
    fn move_child(&self, child: &NodeRef, to_index: usize);

    /// True while this node is part of the host tree.
    fn is_inside_tree(&self) -> bool;

    /// Uniform property write; the host decides how the write lands
    /// (direct field, setter call).
    fn set_property(&self, name: &str, value: Value);

    /// Connect a callback to a named action signal (e.g. a button press).
    fn connect(&self, signal: &str, callback: SignalCallback);

    /// Connect a callback fired when this node enters the host tree.
    fn connect_tree_entered(&self, callback: SignalCallback);

    /// Connect a callback fired when this node is leaving the host tree.
    fn connect_tree_exiting(&self, callback: SignalCallback);

    /// Downcast support for host-specific access.
    fn as_any(&self) -> &dyn Any;
}

// =============================================================================
// Scene Host
// =============================================================================

/// Host services consumed by compositions.
pub trait SceneHost {
    /// Create a detached node of the given host type.
    fn create_node(&self, kind: &str) -> NodeRef;

    /// Current monotonic time in microseconds (host unit; the frame bridge
    /// converts to the nanosecond unit its clock contract promises).
    fn ticks_usec(&self) -> u64;
}
