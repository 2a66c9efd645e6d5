//! Recomposition Engine - declared trees, retained groups, ordered edits.
//!
//! A composition pass re-evaluates the declared content block against the
//! group tree retained from the previous pass. Groups are matched by key
//! (call-site identity plus an optional user key), carrying their host
//! node, remembered slots and cleanups across passes. While the pass runs,
//! nothing touches the host: structural edits and property updates are
//! *recorded* into a change list and replayed through the
//! [`NodeApplier`](crate::engine::applier::NodeApplier) only after the
//! whole pass succeeded - the declared-then-applied two-phase contract. A
//! pass that panics therefore leaves the live tree exactly as it was.
//!
//! Child reconciliation happens per node parent: the flattened list of
//! declared child nodes (declaration order, through any non-node groups)
//! is diffed against the previous pass's list by host identity, emitting
//! removes, single-child moves and bottom-up inserts. Edit batches are
//! recorded in post-order, so a new subtree is fully built and configured
//! before its root is inserted into the parent - which is what makes the
//! bottom-up insert the one doing real work.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::engine::applier::NodeApplier;
use crate::host::{NodeRef, SceneHost, same_node};
use crate::pipeline::frame::{CancelToken, FrameScheduler, FrameTaskControl};
use crate::props::NodeProps;
use crate::state::{Signal, StateRegistry};

// =============================================================================
// Groups
// =============================================================================

/// Call-site identity of a group. Distinct per composable call site.
pub type Site = &'static str;

#[derive(Clone, Debug, PartialEq, Eq)]
struct GroupKey {
    site: Site,
    key: Option<u64>,
}

type Cleanups = Rc<RefCell<Vec<Box<dyn FnOnce()>>>>;

/// One retained unit of the declared tree.
pub(crate) struct Group {
    key: GroupKey,
    node: Option<NodeRef>,
    slots: Vec<Rc<dyn Any>>,
    children: Vec<Group>,
    cleanups: Cleanups,
}

impl Group {
    fn new(key: GroupKey) -> Self {
        Self {
            key,
            node: None,
            slots: Vec::new(),
            children: Vec::new(),
            cleanups: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

/// Drain a retired group's cleanups, children first, into `out`.
pub(crate) fn retire_group_into(mut group: Group, out: &mut Vec<Box<dyn FnOnce()>>) {
    for child in group.children.drain(..) {
        retire_group_into(child, out);
    }
    out.extend(group.cleanups.borrow_mut().drain(..));
}

fn flatten_nodes(children: &[Group], out: &mut Vec<NodeRef>) {
    for group in children {
        if let Some(node) = &group.node {
            out.push(node.clone());
        } else {
            flatten_nodes(&group.children, out);
        }
    }
}

// =============================================================================
// Change List
// =============================================================================

enum Change {
    Down(NodeRef),
    Up,
    InsertBottomUp { index: usize, node: NodeRef },
    Remove { index: usize, count: usize },
    Move { from: usize, to: usize, count: usize },
    UpdateProps(Box<dyn FnOnce()>),
}

/// Everything a successful pass produced, ready to apply.
pub(crate) struct ComposeOutput {
    tree: Group,
    changes: Vec<Change>,
    retired: Vec<Box<dyn FnOnce()>>,
    effects: Vec<Box<dyn FnOnce()>>,
}

impl ComposeOutput {
    /// Replay the pass against the live tree: retired cleanups first, then
    /// the structural/property changes through the applier, then the
    /// side-effect phase. Returns the retained tree for the next pass.
    pub(crate) fn apply(self, root: &NodeRef) -> Group {
        let ComposeOutput {
            tree,
            changes,
            retired,
            effects,
        } = self;
        for cleanup in retired {
            cleanup();
        }
        let mut applier = NodeApplier::new(root.clone());
        for change in changes {
            match change {
                Change::Down(node) => applier.down(node),
                Change::Up => applier.up(),
                Change::InsertBottomUp { index, node } => applier.insert_bottom_up(index, &node),
                Change::Remove { index, count } => applier.remove(index, count),
                Change::Move { from, to, count } => applier.move_children(from, to, count),
                Change::UpdateProps(update) => update(),
            }
        }
        for effect in effects {
            effect();
        }
        tree
    }
}

/// A pass aborted by a panic in user code. Nothing was applied; the
/// cleanups of every group the pass still held are collected here so the
/// composition can tear down before resuming the unwind.
pub(crate) struct PassPanic {
    pub(crate) payload: Box<dyn Any + Send>,
    pub(crate) cleanups: Vec<Box<dyn FnOnce()>>,
}

// =============================================================================
// Child Diff
// =============================================================================

/// Minimal-ish edit sequence transforming `old` into `new`, by identity.
///
/// Removals come out as batched runs; positioning uses single-child
/// backward moves (remove-at/insert-at semantics matching the applier) and
/// bottom-up inserts for fresh nodes.
fn diff_children(old: &[NodeRef], new: &[NodeRef]) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut work: Vec<NodeRef> = old.to_vec();

    // Remove nodes absent from the declared order, in runs.
    let mut i = 0;
    while i < work.len() {
        if new.iter().any(|n| same_node(n, &work[i])) {
            i += 1;
            continue;
        }
        let mut count = 0;
        while i + count < work.len() && !new.iter().any(|n| same_node(n, &work[i + count])) {
            count += 1;
        }
        work.drain(i..i + count);
        changes.push(Change::Remove { index: i, count });
    }

    // Bring every position in line with the declared order.
    for pos in 0..new.len() {
        let target = &new[pos];
        if pos < work.len() && same_node(&work[pos], target) {
            continue;
        }
        if let Some(offset) = work[pos..].iter().position(|w| same_node(w, target)) {
            let from = pos + offset;
            let node = work.remove(from);
            work.insert(pos, node);
            changes.push(Change::Move {
                from,
                to: pos,
                count: 1,
            });
        } else {
            work.insert(pos, target.clone());
            changes.push(Change::InsertBottomUp {
                index: pos,
                node: target.clone(),
            });
        }
    }

    debug_assert!(work.len() == new.len());
    changes
}

// =============================================================================
// Composer
// =============================================================================

struct CFrame {
    group: Group,
    old_children: Vec<Option<Group>>,
    old_flat: Vec<NodeRef>,
    slot_cursor: usize,
}

/// Pass context handed to declared content blocks.
///
/// Declaring is pure with respect to the host: node factories create
/// detached nodes, property blocks mutate the remembered `PropsImpl`, and
/// everything that touches the live tree is deferred to the apply phase.
pub struct Composer {
    host: Rc<dyn SceneHost>,
    registry: StateRegistry,
    scheduler: FrameScheduler,
    canceled: CancelToken,
    frames: Vec<CFrame>,
    changes: Vec<Change>,
    retired: Vec<Box<dyn FnOnce()>>,
    effects: Vec<Box<dyn FnOnce()>>,
    finished: Option<Group>,
}

impl Composer {
    pub(crate) fn new(
        host: Rc<dyn SceneHost>,
        registry: StateRegistry,
        scheduler: FrameScheduler,
        canceled: CancelToken,
    ) -> Self {
        Self {
            host,
            registry,
            scheduler,
            canceled,
            frames: Vec::new(),
            changes: Vec::new(),
            retired: Vec::new(),
            effects: Vec::new(),
            finished: None,
        }
    }

    /// Run one pass over `content` against the tree retained from the
    /// previous pass.
    pub(crate) fn run(
        mut self,
        prev: Option<Group>,
        root: NodeRef,
        content: &mut dyn FnMut(&mut Composer),
    ) -> Result<ComposeOutput, PassPanic> {
        self.open_root(prev, root);
        let outcome = catch_unwind(AssertUnwindSafe(|| content(&mut self)));
        match outcome {
            Ok(()) => {
                self.close();
                let tree = self.finished.take().expect("root group closed");
                log::trace!(
                    "pass recorded {} changes, retired {} cleanups",
                    self.changes.len(),
                    self.retired.len()
                );
                Ok(ComposeOutput {
                    tree,
                    changes: self.changes,
                    retired: self.retired,
                    effects: self.effects,
                })
            }
            Err(payload) => {
                let mut cleanups = std::mem::take(&mut self.retired);
                while let Some(frame) = self.frames.pop() {
                    for old in frame.old_children.into_iter().flatten() {
                        retire_group_into(old, &mut cleanups);
                    }
                    retire_group_into(frame.group, &mut cleanups);
                }
                Err(PassPanic { payload, cleanups })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Declaration surface
    // -------------------------------------------------------------------------

    /// Create a detached host node of `kind`.
    pub fn create_node(&self, kind: &str) -> NodeRef {
        self.host.create_node(kind)
    }

    /// Declare one host node.
    ///
    /// `factory` runs once, when the group first appears, and must not use
    /// the slot surface (`remember`/`state`); wrap the node in a
    /// [`Composer::group`] when per-pass state has to reach it. Every pass
    /// then runs the mandatory property sequence - `clear()`, the declared
    /// block, a recorded `update_node_properties` - and recurses into
    /// `content` for children.
    pub fn node<P: NodeProps + 'static>(
        &mut self,
        site: Site,
        key: Option<u64>,
        factory: impl FnOnce(&mut Composer) -> NodeRef,
        props_init: impl FnOnce() -> P,
        block: impl FnOnce(&mut P),
        content: impl FnOnce(&mut Composer),
    ) {
        self.open(site, key);
        let props: Rc<RefCell<P>> = self.remember(|| RefCell::new(props_init()));

        let node = match self.frames.last().and_then(|f| f.group.node.clone()) {
            Some(node) => node,
            None => {
                let node = factory(self);
                self.frames
                    .last_mut()
                    .expect("node group open")
                    .group
                    .node = Some(node.clone());
                node
            }
        };

        {
            let mut props = props.borrow_mut();
            props.clear();
            block(&mut props);
        }
        let update_node = node.clone();
        self.changes.push(Change::UpdateProps(Box::new(move || {
            props.borrow_mut().update_node_properties(&update_node);
        })));

        content(self);
        self.close();
    }

    /// Declare a non-node group: a control-flow scope whose child nodes
    /// attach to the nearest node ancestor.
    pub fn group(&mut self, site: Site, key: Option<u64>, content: impl FnOnce(&mut Composer)) {
        self.open(site, key);
        content(self);
        self.close();
    }

    /// Keyed scope for list items, so reordered declarations reuse (and
    /// move) their nodes instead of rebuilding them.
    pub fn keyed(&mut self, key: u64, content: impl FnOnce(&mut Composer)) {
        self.group("<keyed>", Some(key), content);
    }

    /// Remember a value in the current group across passes. Reinitialized
    /// when the slot's position or type changes.
    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Rc<T> {
        let frame = self.frames.last_mut().expect("remember outside a composition pass");
        if frame.slot_cursor < frame.group.slots.len() {
            let slot = frame.group.slots[frame.slot_cursor].clone();
            if let Ok(existing) = slot.downcast::<T>() {
                frame.slot_cursor += 1;
                return existing;
            }
            let fresh: Rc<T> = Rc::new(init());
            frame.group.slots[frame.slot_cursor] = fresh.clone();
            frame.slot_cursor += 1;
            return fresh;
        }
        let fresh: Rc<T> = Rc::new(init());
        frame.group.slots.push(fresh.clone());
        frame.slot_cursor += 1;
        fresh
    }

    /// Remember a reactive state cell owned by this composition.
    pub fn state<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Signal<T> {
        let registry = self.registry.clone();
        (*self.remember(move || registry.signal(init()))).clone()
    }

    /// Run `setup` once per group lifetime, in the side-effect phase after
    /// the pass applied; the cleanup it returns runs when the group is
    /// retired or the composition is disposed.
    pub fn disposable_effect(
        &mut self,
        setup: impl FnOnce() -> Box<dyn FnOnce()> + 'static,
    ) {
        let armed = self.remember(|| Cell::new(false));
        if armed.get() {
            return;
        }
        armed.set(true);
        let cleanups = self
            .frames
            .last()
            .expect("effect outside a composition pass")
            .group
            .cleanups
            .clone();
        self.effects.push(Box::new(move || {
            let cleanup = setup();
            cleanups.borrow_mut().push(cleanup);
        }));
    }

    /// Register a cleanup for this group with no setup step.
    pub fn on_dispose(&mut self, cleanup: impl FnOnce() + 'static) {
        self.disposable_effect(move || Box::new(cleanup));
    }

    /// Run `task` once per host frame (with the frame timestamp in
    /// nanoseconds) for as long as this group lives and the composition is
    /// active. The state-machine form of a suspended frame-clock loop.
    pub fn frame_task(&mut self, mut task: impl FnMut(u64) -> FrameTaskControl + 'static) {
        let scheduler = self.scheduler.clone();
        let composition_canceled = self.canceled.clone();
        self.disposable_effect(move || {
            let token: CancelToken = Rc::new(Cell::new(false));
            let cancel = token.clone();
            scheduler.frame_task(token, move |nanos| {
                if composition_canceled.get() {
                    return FrameTaskControl::Stop;
                }
                task(nanos)
            });
            Box::new(move || cancel.set(true))
        });
    }

    // -------------------------------------------------------------------------
    // Group bookkeeping
    // -------------------------------------------------------------------------

    fn open_root(&mut self, prev: Option<Group>, root: NodeRef) {
        let key = GroupKey {
            site: "<root>",
            key: None,
        };
        let (mut group, old_children) = match prev {
            Some(mut prev) => {
                let old: Vec<Option<Group>> = prev.children.drain(..).map(Some).collect();
                (prev, old)
            }
            None => (Group::new(key), Vec::new()),
        };
        group.node = Some(root);
        let old_flat = flatten_opt(&old_children);
        self.frames.push(CFrame {
            group,
            old_children,
            old_flat,
            slot_cursor: 0,
        });
    }

    fn open(&mut self, site: Site, key: Option<u64>) {
        let group_key = GroupKey { site, key };
        let reused = self
            .frames
            .last_mut()
            .expect("group opened outside a composition pass")
            .old_children
            .iter_mut()
            .find(|slot| matches!(slot, Some(g) if g.key == group_key))
            .and_then(Option::take);

        let (group, old_children) = match reused {
            Some(mut group) => {
                let old: Vec<Option<Group>> = group.children.drain(..).map(Some).collect();
                (group, old)
            }
            None => (Group::new(group_key), Vec::new()),
        };
        let old_flat = flatten_opt(&old_children);
        self.frames.push(CFrame {
            group,
            old_children,
            old_flat,
            slot_cursor: 0,
        });
    }

    fn close(&mut self) {
        let mut frame = self.frames.pop().expect("close without open");
        frame.group.slots.truncate(frame.slot_cursor);

        for old in frame.old_children.into_iter().flatten() {
            retire_group_into(old, &mut self.retired);
        }

        if let Some(node) = frame.group.node.clone() {
            let mut new_flat = Vec::new();
            flatten_nodes(&frame.group.children, &mut new_flat);
            let edits = diff_children(&frame.old_flat, &new_flat);
            if !edits.is_empty() {
                self.changes.push(Change::Down(node));
                self.changes.extend(edits);
                self.changes.push(Change::Up);
            }
        }

        match self.frames.last_mut() {
            Some(parent) => parent.group.children.push(frame.group),
            None => self.finished = Some(frame.group),
        }
    }
}

fn flatten_opt(children: &[Option<Group>]) -> Vec<NodeRef> {
    let mut out = Vec::new();
    for group in children.iter().flatten() {
        if let Some(node) = &group.node {
            out.push(node.clone());
        } else {
            flatten_nodes(&group.children, &mut out);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::host::memory::{MemoryHost, as_memory};
    use crate::host::{SceneHost, SceneNode};
    use crate::props::NodeProps;

    use super::*;

    struct NoProps;

    impl NodeProps for NoProps {
        fn clear(&mut self) {}
        fn update_node_properties(&mut self, _node: &NodeRef) {}
    }

    fn leaf(cx: &mut Composer, site: Site, kind: &'static str) {
        cx.node(site, None, |cx| cx.create_node(kind), || NoProps, |_| {}, |_| {});
    }

    struct Harness {
        host: Rc<MemoryHost>,
        root: NodeRef,
        registry: StateRegistry,
        scheduler: FrameScheduler,
        canceled: CancelToken,
        tree: Option<Group>,
    }

    impl Harness {
        fn new() -> Self {
            let host = MemoryHost::new();
            let root = host.create_node("Root");
            host.root().add_child(&root);
            Self {
                host,
                root,
                registry: StateRegistry::new(),
                scheduler: FrameScheduler::new(),
                canceled: Rc::new(Cell::new(false)),
                tree: None,
            }
        }

        fn pass(&mut self, content: &mut dyn FnMut(&mut Composer)) {
            let composer = Composer::new(
                self.host.clone(),
                self.registry.clone(),
                self.scheduler.clone(),
                self.canceled.clone(),
            );
            let output = composer
                .run(self.tree.take(), self.root.clone(), content)
                .unwrap_or_else(|_| panic!("pass panicked"));
            self.tree = Some(output.apply(&self.root));
        }

        fn kinds(&self) -> Vec<String> {
            as_memory(&self.root).child_kinds()
        }
    }

    #[test]
    fn test_initial_pass_builds_declared_tree() {
        let mut harness = Harness::new();
        harness.pass(&mut |cx| {
            cx.node(
                "vbox",
                None,
                |cx| cx.create_node("VBox"),
                || NoProps,
                |_| {},
                |cx| {
                    leaf(cx, "a", "Label");
                    leaf(cx, "b", "Button");
                },
            );
        });

        assert_eq!(harness.kinds(), ["VBox"]);
        let vbox = harness.root.child_at(0);
        assert_eq!(as_memory(&vbox).child_kinds(), ["Label", "Button"]);
    }

    #[test]
    fn test_conditional_children_insert_and_remove() {
        let mut harness = Harness::new();
        let show = harness.registry.signal(false);

        let mut content = {
            let show = show.clone();
            move |cx: &mut Composer| {
                let show = show.get();
                leaf(cx, "first", "Label");
                cx.group("cond", None, |cx| {
                    if show {
                        leaf(cx, "extra", "Extra");
                    }
                });
                leaf(cx, "last", "Button");
            }
        };

        harness.pass(&mut content);
        assert_eq!(harness.kinds(), ["Label", "Button"]);

        show.set(true);
        harness.pass(&mut content);
        assert_eq!(harness.kinds(), ["Label", "Extra", "Button"]);

        show.set(false);
        harness.pass(&mut content);
        assert_eq!(harness.kinds(), ["Label", "Button"]);
    }

    #[test]
    fn test_node_identity_survives_recomposition() {
        let mut harness = Harness::new();
        let mut content = |cx: &mut Composer| {
            leaf(cx, "a", "Label");
            leaf(cx, "b", "Label");
        };
        harness.pass(&mut content);
        let ids_before = as_memory(&harness.root).child_ids();
        harness.pass(&mut content);
        assert_eq!(as_memory(&harness.root).child_ids(), ids_before);
    }

    #[test]
    fn test_keyed_reorder_moves_nodes() {
        let mut harness = Harness::new();
        let order = harness.registry.signal(vec![1u64, 2, 3]);

        let mut content = {
            let order = order.clone();
            move |cx: &mut Composer| {
                for key in order.get() {
                    cx.keyed(key, |cx| leaf(cx, "item", "Item"));
                }
            }
        };

        harness.pass(&mut content);
        let ids = as_memory(&harness.root).child_ids();

        order.set(vec![3, 1, 2]);
        harness.pass(&mut content);
        assert_eq!(
            as_memory(&harness.root).child_ids(),
            vec![ids[2], ids[0], ids[1]]
        );

        order.set(vec![2, 3]);
        harness.pass(&mut content);
        assert_eq!(as_memory(&harness.root).child_ids(), vec![ids[1], ids[2]]);
    }

    #[test]
    fn test_remember_persists_and_drops_with_group() {
        let mut harness = Harness::new();
        let keep = harness.registry.signal(true);
        let inits = Rc::new(Cell::new(0));

        let mut content = {
            let keep = keep.clone();
            let inits = inits.clone();
            move |cx: &mut Composer| {
                let keep = keep.get();
                cx.group("maybe", None, |cx| {
                    if keep {
                        cx.group("inner", None, |cx| {
                            let inits = inits.clone();
                            let value = cx.remember(move || {
                                inits.set(inits.get() + 1);
                                41
                            });
                            assert_eq!(*value, 41);
                        });
                    }
                });
            }
        };

        harness.pass(&mut content);
        harness.pass(&mut content);
        assert_eq!(inits.get(), 1);

        keep.set(false);
        harness.pass(&mut content);
        keep.set(true);
        harness.pass(&mut content);
        // The group was retired in between, so the slot reinitialized.
        assert_eq!(inits.get(), 2);
    }

    #[test]
    fn test_cleanups_run_on_retire_children_first() {
        let mut harness = Harness::new();
        let keep = harness.registry.signal(true);
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut content = {
            let keep = keep.clone();
            let order = order.clone();
            move |cx: &mut Composer| {
                let keep = keep.get();
                let order = order.clone();
                cx.group("outer", None, move |cx| {
                    if keep {
                        let order2 = order.clone();
                        cx.group("parent", None, move |cx| {
                            let order3 = order2.clone();
                            cx.on_dispose(move || order3.borrow_mut().push("parent"));
                            let order4 = order2.clone();
                            cx.group("child", None, move |cx| {
                                cx.on_dispose(move || order4.borrow_mut().push("child"));
                            });
                        });
                    }
                });
            }
        };

        harness.pass(&mut content);
        assert!(order.borrow().is_empty());

        keep.set(false);
        harness.pass(&mut content);
        assert_eq!(*order.borrow(), ["child", "parent"]);
    }

    #[test]
    fn test_effects_run_once_in_side_effect_phase() {
        let mut harness = Harness::new();
        let setups = Rc::new(Cell::new(0));

        let mut content = {
            let setups = setups.clone();
            move |cx: &mut Composer| {
                let setups = setups.clone();
                cx.group("g", None, move |cx| {
                    let setups2 = setups.clone();
                    cx.disposable_effect(move || {
                        setups2.set(setups2.get() + 1);
                        Box::new(|| {})
                    });
                });
            }
        };

        harness.pass(&mut content);
        harness.pass(&mut content);
        harness.pass(&mut content);
        assert_eq!(setups.get(), 1);
    }

    #[test]
    fn test_panic_mid_pass_applies_nothing_and_yields_cleanups() {
        let host = MemoryHost::new();
        let root = host.create_node("Root");
        host.root().add_child(&root);
        let registry = StateRegistry::new();
        let scheduler = FrameScheduler::new();
        let canceled: CancelToken = Rc::new(Cell::new(false));

        // First pass: one label with a cleanup.
        let cleaned = Rc::new(Cell::new(false));
        let mut first = {
            let cleaned = cleaned.clone();
            move |cx: &mut Composer| {
                let cleaned = cleaned.clone();
                cx.group("g", None, move |cx| {
                    cx.on_dispose(move || cleaned.set(true));
                    leaf(cx, "a", "Label");
                });
            }
        };
        let composer = Composer::new(
            host.clone(),
            registry.clone(),
            scheduler.clone(),
            canceled.clone(),
        );
        let tree = composer
            .run(None, root.clone(), &mut first)
            .ok()
            .expect("first pass succeeds")
            .apply(&root);
        assert_eq!(as_memory(&root).child_kinds(), ["Label"]);

        // Second pass panics after declaring extra structure.
        let mut second = |cx: &mut Composer| {
            leaf(cx, "a", "Label");
            leaf(cx, "b", "Button");
            panic!("user code fault");
        };
        let composer = Composer::new(host.clone(), registry, scheduler, canceled);
        let fault = match composer.run(Some(tree), root.clone(), &mut second) {
            Err(fault) => fault,
            Ok(_) => panic!("pass should have faulted"),
        };

        // Two-phase: the live tree is untouched by the failed pass.
        assert_eq!(as_memory(&root).child_kinds(), ["Label"]);

        // The collected cleanups tear the composition's effects down.
        assert!(!cleaned.get());
        for cleanup in fault.cleanups {
            cleanup();
        }
        assert!(cleaned.get());
    }

    #[test]
    fn test_state_cells_persist_across_passes() {
        let mut harness = Harness::new();
        let observed = Rc::new(RefCell::new(Vec::new()));

        let mut content = {
            let observed = observed.clone();
            move |cx: &mut Composer| {
                let count = cx.state(|| 0u32);
                observed.borrow_mut().push(count.get());
                if count.get() == 0 {
                    count.set(10);
                }
            }
        };

        harness.pass(&mut content);
        harness.pass(&mut content);
        assert_eq!(*observed.borrow(), vec![0, 10]);
    }
}
