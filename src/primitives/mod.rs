//! Widget Primitives - declarative call sites over the reconciler.
//!
//! Thin composables for the core control set. Each one declares a node
//! group with its generated props pair and runs the mandatory per-pass
//! property sequence through [`Composer::node`]; nothing here touches the
//! host directly.
//!
//! # Example
//!
//! ```ignore
//! use scene_compose::pipeline::start_tree_composition;
//! use scene_compose::primitives::{button, label, vbox};
//!
//! start_tree_composition(host, anchor, |cx| {
//!     vbox(cx, |cx| {
//!         label(cx, "Hello");
//!         let count = cx.state(|| 0);
//!         let bump = count.clone();
//!         button(cx, "Add", move || bump.update(|v| *v += 1));
//!         for i in 0..count.get() {
//!             cx.keyed(i, |cx| label(cx, "Hello again"));
//!         }
//!     });
//! })?;
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::composer::{Composer, Site};
use crate::host::SceneNode;
use crate::props::NodeProps;
use crate::props::controls::{
    BoxContainerProps, BoxContainerPropsImpl, ButtonProps, ButtonPropsImpl, LabelProps,
    LabelPropsImpl,
};

// =============================================================================
// Shared Node Helper
// =============================================================================

/// Declare one control node: factory, props pair, children.
fn control_node<P: NodeProps + 'static>(
    cx: &mut Composer,
    site: Site,
    kind: &'static str,
    props_init: impl FnOnce() -> P,
    block: impl FnOnce(&mut P),
    content: impl FnOnce(&mut Composer),
) {
    cx.node(
        site,
        None,
        |cx| cx.create_node(kind),
        props_init,
        block,
        content,
    );
}

// =============================================================================
// Label
// =============================================================================

/// Shortcut for a label declaring only its text.
pub fn label(cx: &mut Composer, text: &str) {
    label_with(cx, text, |_| {});
}

/// Label with a full property block; the text argument wins over a `text`
/// set inside the block.
pub fn label_with(cx: &mut Composer, text: &str, props: impl FnOnce(&mut dyn LabelProps)) {
    let text = text.to_string();
    control_node(
        cx,
        "label",
        "Label",
        LabelPropsImpl::new,
        move |p| {
            props(p);
            p.text(text);
        },
        |_| {},
    );
}

// =============================================================================
// Button
// =============================================================================

/// Push button wired to `on_press`.
///
/// The handler is connected to the host signal once, at node creation,
/// through a cell refreshed every pass - so the connected callback always
/// sees the latest pass's captured state.
pub fn button(cx: &mut Composer, text: &str, on_press: impl Fn() + 'static) {
    let text = text.to_string();
    let on_press: Rc<dyn Fn()> = Rc::new(on_press);
    cx.group("button", None, move |cx| {
        let cell: Rc<RefCell<Rc<dyn Fn()>>> =
            cx.remember(|| RefCell::new(Rc::new(|| {}) as Rc<dyn Fn()>));
        *cell.borrow_mut() = on_press;

        let connected = cell.clone();
        cx.node(
            "button-node",
            None,
            move |cx| {
                let node = cx.create_node("Button");
                node.connect(
                    "pressed",
                    Rc::new(move || {
                        let handler = connected.borrow().clone();
                        handler();
                    }),
                );
                node
            },
            ButtonPropsImpl::new,
            move |p| p.text(text),
            |_| {},
        );
    });
}

// =============================================================================
// Box Containers
// =============================================================================

/// Vertical box container.
pub fn vbox(cx: &mut Composer, content: impl FnOnce(&mut Composer)) {
    control_node(
        cx,
        "vbox",
        "VBoxContainer",
        BoxContainerPropsImpl::new,
        |_| {},
        content,
    );
}

/// Vertical box container with a property block.
pub fn vbox_with(
    cx: &mut Composer,
    props: impl FnOnce(&mut dyn BoxContainerProps),
    content: impl FnOnce(&mut Composer),
) {
    control_node(
        cx,
        "vbox",
        "VBoxContainer",
        BoxContainerPropsImpl::new,
        |p| props(p),
        content,
    );
}

/// Horizontal box container.
pub fn hbox(cx: &mut Composer, content: impl FnOnce(&mut Composer)) {
    control_node(
        cx,
        "hbox",
        "HBoxContainer",
        BoxContainerPropsImpl::new,
        |_| {},
        content,
    );
}
