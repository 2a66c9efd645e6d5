//! Composition Engine - reconciliation and tree editing.
//!
//! The engine turns declared content into host tree mutations:
//!
//! ```text
//! content block → group tree (composer) → ordered edits → NodeApplier → host tree
//! ```
//!
//! - [`composer`] re-evaluates declared content against the tree retained
//!   from the previous pass and records a change list.
//! - [`applier`] replays that change list as cursor-relative structural
//!   edits against the host's child lists.
//!
//! Recording and replaying are strictly separated: a pass that fails
//! leaves the live tree untouched.

pub mod applier;
pub mod composer;

pub use applier::NodeApplier;
pub use composer::{Composer, Site};
