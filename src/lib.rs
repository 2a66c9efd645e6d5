//! # scene-compose
//!
//! Declarative reactive UI compositions for retained scene-graph hosts.
//!
//! The host engine owns the live node tree and drives execution through a
//! single per-frame callback; this crate keeps a declared tree and that
//! live tree in sync and schedules all reactive work around the frame.
//!
//! ## Architecture
//!
//! ```text
//! declared content → composer diff → ordered edits → NodeApplier → host tree
//! state writes → apply coordinator → work queue → host frame callback → recompose
//! ```
//!
//! One [`Composition`](pipeline::Composition) is started per anchoring,
//! tree-resident host node and lives until that node leaves the host tree.
//! Per recomposition pass, each declared node runs the mandatory property
//! sequence against its generated dirty-tracking props pair: `clear()`,
//! the declared block, `update_node_properties()`.
//!
//! Everything is single-threaded cooperative on the host frame thread:
//! suspensions are values in the frame bridge's registries, resumed by the
//! frame-start signal, and there is no parallelism anywhere - only
//! cooperative interleaving.
//!
//! ## Modules
//!
//! - [`host`] - the consumed host surface (node ops, factory, clock) and
//!   the in-memory reference host
//! - [`engine`] - composer (reconciliation) and applier (tree editing)
//! - [`state`] - signal cells and the write-observer subscription
//! - [`pipeline`] - frame bridge, apply coordinator, composition lifecycle
//! - [`props`] - dirty-tracking property appliers and their generator
//! - [`primitives`] - declarative call sites for the core control set

pub mod engine;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod primitives;
pub mod props;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::{Value, Vec2};

pub use error::{CompositionError, Result};

pub use host::{MemoryHost, NodeRef, SceneHost, SceneNode, same_node};

pub use engine::{Composer, NodeApplier, Site};

pub use state::{Signal, SignalId, StateRegistry, WriteObserverHandle};

pub use pipeline::{
    ApplyCoordinator, CancelToken, Composition, FrameScheduler, FrameTaskControl,
    start_tree_composition,
};

pub use props::{NodeProps, PropField};

pub use props::controls::{
    BoxContainerProps, BoxContainerPropsImpl, ButtonProps, ButtonPropsImpl, ControlProps,
    ControlPropsImpl, LabelProps, LabelPropsImpl,
};

pub use primitives::{button, hbox, label, label_with, vbox, vbox_with};
