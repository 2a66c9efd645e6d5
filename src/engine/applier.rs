//! Tree Editor - ordered structural edits against the host tree.
//!
//! Translates the edit stream produced by a reconciliation pass into host
//! mutation calls. All operations are relative to a "current" node, a
//! cursor the engine pushes and pops as it descends and ascends the
//! declared tree.
//!
//! Indices are produced internally by the reconciliation engine and assumed
//! valid; an out-of-range index is a programming-error fault and panics
//! (inside the host's child accessors) rather than silently no-oping.

use smallvec::SmallVec;

use crate::host::{NodeRef, SceneNode};

// =============================================================================
// Node Applier
// =============================================================================

/// Cursor-relative editor over one host subtree.
///
/// Owns no nodes; every mutation goes through the host node API of the
/// current cursor target.
pub struct NodeApplier {
    root: NodeRef,
    current: NodeRef,
    stack: SmallVec<[NodeRef; 8]>,
}

impl NodeApplier {
    /// Create an applier rooted at `root`; the cursor starts there.
    pub fn new(root: NodeRef) -> Self {
        Self {
            current: root.clone(),
            root,
            stack: SmallVec::new(),
        }
    }

    /// The node edits are currently applied to.
    pub fn current(&self) -> &NodeRef {
        &self.current
    }

    /// Descend: `node` becomes the current edit target.
    pub fn down(&mut self, node: NodeRef) {
        self.stack.push(self.current.clone());
        self.current = node;
    }

    /// Ascend back to the previous edit target.
    pub fn up(&mut self) {
        self.current = self.stack.pop().expect("up() without a matching down()");
    }

    /// Top-down insertion notification. Informational only: the host tree
    /// is built bottom-up, so the actual attachment happens in
    /// [`NodeApplier::insert_bottom_up`].
    pub fn insert_top_down(&mut self, _index: usize, _node: &NodeRef) {}

    /// Attach `node` as a child of the current node so it occupies `index`.
    ///
    /// Appends first; when the post-append child count differs from the
    /// requested index (siblings already occupy the slot), issues a host
    /// reorder so the node lands exactly at `index`.
    pub fn insert_bottom_up(&mut self, index: usize, node: &NodeRef) {
        log::trace!("insert node {} at {}", node.id(), index);
        self.current.add_child(node);
        if index != self.current.child_count() {
            self.current.move_child(node, index);
        }
    }

    /// Remove `count` consecutive children starting at `index`.
    ///
    /// Each removal shifts subsequent indices down by one, so this removes
    /// by identity at `index` repeatedly.
    pub fn remove(&mut self, index: usize, count: usize) {
        log::trace!("remove {} children at {}", count, index);
        for _ in 0..count {
            let child = self.current.child_at(index);
            self.current.remove_child(&child);
        }
    }

    /// Relocate a contiguous run of `count` children from `from` to `to`.
    ///
    /// Performed as `count` single-child reorders whose indices account for
    /// the shift each move inflicts on the not-yet-moved rest of the run:
    /// moving backwards the source advances with the step; moving forwards
    /// the source stays put because extracting the front of the shrinking
    /// run always leaves the next child at `from`.
    pub fn move_children(&mut self, from: usize, to: usize, count: usize) {
        if from == to {
            return;
        }
        log::trace!("move {} children from {} to {}", count, from, to);
        for i in 0..count {
            let (from_index, to_index) = if from > to {
                (from + i, to + i)
            } else {
                (from, to + count - 2)
            };
            let child = self.current.child_at(from_index);
            self.current.move_child(&child, to_index);
        }
    }

    /// Remove every child of the root, used when a composition is
    /// discarded wholesale.
    pub fn clear(&mut self) {
        log::trace!("clear {} children from root", self.root.child_count());
        while self.root.child_count() > 0 {
            let child = self.root.child_at(0);
            self.root.remove_child(&child);
        }
    }
}
