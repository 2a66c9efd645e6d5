//! In-memory reference host.
//!
//! A complete [`SceneHost`]/[`SceneNode`] implementation with explicit tree
//! membership, recorded property writes, emittable action signals and a
//! settable microsecond clock. The test suite runs entirely against it, and
//! embedders without a live engine can use it as a headless scene.
//!
//! # Semantics
//!
//! - `move_child` removes the child and reinserts it at the target index,
//!   which is the remove-then-insert behavior scene hosts implement.
//! - Tree membership propagates: adding a subtree under an in-tree parent
//!   marks and notifies the whole subtree entered; removing it notifies
//!   exiting (parent first) and then clears membership.
//! - Exit callbacks fire while the node is still marked inside the tree,
//!   so teardown logic can still walk the structure.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::Value;

use super::{NodeRef, SceneHost, SceneNode, SignalCallback, same_node};

// =============================================================================
// Memory Host
// =============================================================================

/// In-memory scene host: node factory, scene root and a manual clock.
pub struct MemoryHost {
    next_id: Cell<u64>,
    clock_usec: Cell<u64>,
    root: RefCell<Option<NodeRef>>,
}

impl MemoryHost {
    pub fn new() -> Rc<Self> {
        let host = Rc::new(Self {
            next_id: Cell::new(1),
            clock_usec: Cell::new(0),
            root: RefCell::new(None),
        });
        let root = host.create_node("SceneRoot");
        as_memory(&root).in_tree.set(true);
        *host.root.borrow_mut() = Some(root);
        host
    }

    /// The scene root; always inside the tree.
    pub fn root(&self) -> NodeRef {
        self.root.borrow().as_ref().expect("host has a root").clone()
    }

    /// Advance the monotonic clock by `usec`.
    pub fn advance_clock(&self, usec: u64) {
        self.clock_usec.set(self.clock_usec.get() + usec);
    }
}

impl SceneHost for MemoryHost {
    fn create_node(&self, kind: &str) -> NodeRef {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Rc::new(MemoryNode {
            id,
            kind: kind.to_string(),
            children: RefCell::new(Vec::new()),
            in_tree: Cell::new(false),
            properties: RefCell::new(HashMap::new()),
            signals: RefCell::new(HashMap::new()),
            tree_entered: RefCell::new(Vec::new()),
            tree_exiting: RefCell::new(Vec::new()),
        })
    }

    fn ticks_usec(&self) -> u64 {
        self.clock_usec.get()
    }
}

// =============================================================================
// Memory Node
// =============================================================================

/// In-memory scene node.
pub struct MemoryNode {
    id: u64,
    kind: String,
    children: RefCell<Vec<NodeRef>>,
    in_tree: Cell<bool>,
    properties: RefCell<HashMap<String, Value>>,
    signals: RefCell<HashMap<String, Vec<SignalCallback>>>,
    tree_entered: RefCell<Vec<SignalCallback>>,
    tree_exiting: RefCell<Vec<SignalCallback>>,
}

impl MemoryNode {
    /// Last written value for a property, if any write happened.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.properties.borrow().get(name).cloned()
    }

    /// Emit an action signal, invoking every connected callback.
    pub fn emit(&self, signal: &str) {
        let callbacks = self
            .signals
            .borrow()
            .get(signal)
            .cloned()
            .unwrap_or_default();
        for callback in callbacks {
            callback();
        }
    }

    /// Child kinds in order, for structural assertions.
    pub fn child_kinds(&self) -> Vec<String> {
        self.children
            .borrow()
            .iter()
            .map(|c| c.kind().to_string())
            .collect()
    }

    /// Child ids in order, for structural assertions.
    pub fn child_ids(&self) -> Vec<u64> {
        self.children.borrow().iter().map(|c| c.id()).collect()
    }

    fn index_of(&self, child: &NodeRef) -> usize {
        self.children
            .borrow()
            .iter()
            .position(|c| same_node(c, child))
            .expect("node is not a child of this parent")
    }

    fn propagate_entered(node: &NodeRef) {
        let mem = as_memory(node);
        if mem.in_tree.get() {
            return;
        }
        mem.in_tree.set(true);
        let callbacks = mem.tree_entered.borrow().clone();
        for callback in callbacks {
            callback();
        }
        let children = mem.children.borrow().clone();
        for child in children {
            Self::propagate_entered(&child);
        }
    }

    fn propagate_exiting(node: &NodeRef) {
        let mem = as_memory(node);
        if !mem.in_tree.get() {
            return;
        }
        // Callbacks fire before membership is cleared; callbacks may detach
        // descendants, which the in_tree guard keeps from double-notifying.
        let callbacks = mem.tree_exiting.borrow().clone();
        for callback in callbacks {
            callback();
        }
        let children = mem.children.borrow().clone();
        for child in children {
            Self::propagate_exiting(&child);
        }
        mem.in_tree.set(false);
    }
}

impl SceneNode for MemoryNode {
    fn id(&self) -> u64 {
        self.id
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    fn child_at(&self, index: usize) -> NodeRef {
        self.children.borrow()[index].clone()
    }

    fn add_child(&self, child: &NodeRef) {
        self.children.borrow_mut().push(child.clone());
        if self.in_tree.get() {
            Self::propagate_entered(child);
        }
    }

    fn remove_child(&self, child: &NodeRef) {
        let index = self.index_of(child);
        self.children.borrow_mut().remove(index);
        if self.in_tree.get() {
            Self::propagate_exiting(child);
        }
    }

    fn move_child(&self, child: &NodeRef, to_index: usize) {
        let index = self.index_of(child);
        let mut children = self.children.borrow_mut();
        let node = children.remove(index);
        children.insert(to_index, node);
    }

    fn is_inside_tree(&self) -> bool {
        self.in_tree.get()
    }

    fn set_property(&self, name: &str, value: Value) {
        self.properties.borrow_mut().insert(name.to_string(), value);
    }

    fn connect(&self, signal: &str, callback: SignalCallback) {
        self.signals
            .borrow_mut()
            .entry(signal.to_string())
            .or_default()
            .push(callback);
    }

    fn connect_tree_entered(&self, callback: SignalCallback) {
        self.tree_entered.borrow_mut().push(callback);
    }

    fn connect_tree_exiting(&self, callback: SignalCallback) {
        self.tree_exiting.borrow_mut().push(callback);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// View a [`NodeRef`] as the memory node it wraps.
///
/// Panics when handed a node from a different host implementation.
pub fn as_memory(node: &NodeRef) -> &MemoryNode {
    node.as_any()
        .downcast_ref::<MemoryNode>()
        .expect("node does not belong to the memory host")
}
