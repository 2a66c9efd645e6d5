//! Dirty-Tracking Property Appliers.
//!
//! Per node type there is a `Props`/`PropsImpl` pair: the trait is the
//! capability set of externally assignable fields, the impl additionally
//! tracks which fields the current pass actually set and pushes only those
//! to the live node. The mandatory sequence per recomposition pass is
//!
//! ```text
//! clear()  →  declared property block  →  update_node_properties()
//! ```
//!
//! so every pass starts from a defaulted snapshot and replays only what
//! was declared this pass. A field that was pushed in an earlier pass and
//! is not re-declared after a `clear()` has its default pushed back - the
//! node never keeps stale declared state - while a field that was never
//! set is never written at all.
//!
//! Pairs are generated by [`node_props!`] from a declarative schema: field
//! name, type, default value and the property name the write lands on.
//! Supertype capability sets accumulate by composition: a subtype's impl
//! embeds its supertype's impl and delegates the inherited setters, and
//! its trait extends the supertype trait, so one declared block can set
//! both its own and inherited fields.

use crate::host::{NodeRef, SceneNode};
use crate::types::Value;

pub mod controls;

// =============================================================================
// Contract
// =============================================================================

/// Per-pass property applier for one live node.
pub trait NodeProps {
    /// Reset every field to its default and every set flag to false.
    /// Runs ahead of the declared block each pass.
    fn clear(&mut self);

    /// Push fields set during this pass to the node; restore defaults for
    /// fields that were pushed before but not re-declared.
    fn update_node_properties(&mut self, node: &NodeRef);
}

// =============================================================================
// Prop Field
// =============================================================================

/// One tracked field of a `PropsImpl`.
///
/// `set` means "assigned during the current pass"; `applied` means "the
/// live node currently holds a value this field pushed". The pairing is
/// what lets an undeclared field restore its default exactly once instead
/// of being rewritten every pass or never.
#[derive(Debug)]
pub struct PropField<T> {
    value: T,
    set: bool,
    applied: bool,
}

impl<T> PropField<T> {
    pub fn new(default: T) -> Self {
        Self {
            value: default,
            set: false,
            applied: false,
        }
    }

    /// Current field value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// True if the field was assigned during the current pass.
    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Assign from a declared block.
    pub fn assign(&mut self, value: T) {
        self.value = value;
        self.set = true;
    }

    /// Reset to the default ahead of a pass. `applied` persists - it
    /// describes the node, not the pass.
    pub fn clear(&mut self, default: T) {
        self.value = default;
        self.set = false;
    }
}

impl<T: Clone + Into<Value>> PropField<T> {
    /// Apply this field to `node` under `property`.
    pub fn push(&mut self, node: &NodeRef, property: &str, default: T) {
        if self.set {
            node.set_property(property, self.value.clone().into());
            self.applied = true;
        } else if self.applied {
            node.set_property(property, default.into());
            self.applied = false;
        }
    }
}

// =============================================================================
// Generation Macro
// =============================================================================

/// Generate a `Props` capability trait and its dirty-tracking `PropsImpl`
/// from a schema of `field: Type = default => "property"` lines.
///
/// Two forms: a base capability set, and an extending set that names its
/// supertype pair plus the inherited fields to delegate:
///
/// ```ignore
/// node_props! {
///     pub trait ControlProps for ControlPropsImpl {
///         position: Vec2 = Vec2::ZERO => "position",
///     }
/// }
///
/// node_props! {
///     pub trait LabelProps: ControlProps for LabelPropsImpl {
///         base control: ControlPropsImpl;
///         inherit { position: Vec2 }
///         text: String = String::new() => "text",
///     }
/// }
/// ```
#[macro_export]
macro_rules! node_props {
    (
        $(#[$trait_meta:meta])*
        pub trait $trait_name:ident for $impl_name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $field_ty:ty = $default:expr => $property:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$trait_meta])*
        pub trait $trait_name {
            $(
                $(#[$field_meta])*
                fn $field(&mut self, value: $field_ty);
            )+
        }

        #[doc = concat!("Dirty-tracking applier backing [`", stringify!($trait_name), "`].")]
        pub struct $impl_name {
            $( $field: $crate::props::PropField<$field_ty>, )+
        }

        impl $impl_name {
            pub fn new() -> Self {
                Self {
                    $( $field: $crate::props::PropField::new($default), )+
                }
            }
        }

        impl Default for $impl_name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $trait_name for $impl_name {
            $(
                fn $field(&mut self, value: $field_ty) {
                    self.$field.assign(value);
                }
            )+
        }

        impl $crate::props::NodeProps for $impl_name {
            fn clear(&mut self) {
                $( self.$field.clear($default); )+
            }

            fn update_node_properties(&mut self, node: &$crate::host::NodeRef) {
                $( self.$field.push(node, $property, $default); )+
            }
        }
    };

    (
        $(#[$trait_meta:meta])*
        pub trait $trait_name:ident : $base_trait:ident for $impl_name:ident {
            base $base_field:ident : $base_impl:ident ;
            inherit { $( $inherited:ident : $inherited_ty:ty ),+ $(,)? }
            $(
                $(#[$field_meta:meta])*
                $field:ident : $field_ty:ty = $default:expr => $property:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$trait_meta])*
        pub trait $trait_name : $base_trait {
            $(
                $(#[$field_meta])*
                fn $field(&mut self, value: $field_ty);
            )+
        }

        #[doc = concat!("Dirty-tracking applier backing [`", stringify!($trait_name), "`].")]
        pub struct $impl_name {
            $base_field: $base_impl,
            $( $field: $crate::props::PropField<$field_ty>, )+
        }

        impl $impl_name {
            pub fn new() -> Self {
                Self {
                    $base_field: <$base_impl>::new(),
                    $( $field: $crate::props::PropField::new($default), )+
                }
            }
        }

        impl Default for $impl_name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $base_trait for $impl_name {
            $(
                fn $inherited(&mut self, value: $inherited_ty) {
                    self.$base_field.$inherited(value);
                }
            )+
        }

        impl $trait_name for $impl_name {
            $(
                fn $field(&mut self, value: $field_ty) {
                    self.$field.assign(value);
                }
            )+
        }

        impl $crate::props::NodeProps for $impl_name {
            fn clear(&mut self) {
                $crate::props::NodeProps::clear(&mut self.$base_field);
                $( self.$field.clear($default); )+
            }

            fn update_node_properties(&mut self, node: &$crate::host::NodeRef) {
                $crate::props::NodeProps::update_node_properties(&mut self.$base_field, node);
                $( self.$field.push(node, $property, $default); )+
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::host::SceneHost;
    use crate::host::memory::{MemoryHost, as_memory};
    use crate::types::Value;

    use super::*;

    #[test]
    fn test_prop_field_set_tracking() {
        let mut field = PropField::new(0i64);
        assert!(!field.is_set());
        field.assign(7);
        assert!(field.is_set());
        assert_eq!(*field.value(), 7);
        field.clear(0);
        assert!(!field.is_set());
        assert_eq!(*field.value(), 0);
    }

    #[test]
    fn test_prop_field_push_and_restore() {
        let host = MemoryHost::new();
        let node = host.create_node("N");
        let mut field = PropField::new(0i64);

        // Never set: never written.
        field.push(&node, "x", 0);
        assert_eq!(as_memory(&node).property("x"), None);

        // Set: written, marked applied.
        field.assign(7);
        field.push(&node, "x", 0);
        assert_eq!(as_memory(&node).property("x"), Some(Value::Int(7)));

        // Cleared and not re-set: default restored once.
        field.clear(0);
        field.push(&node, "x", 0);
        assert_eq!(as_memory(&node).property("x"), Some(Value::Int(0)));

        // Still untouched afterwards: no further writes.
        node.set_property("x", Value::Int(99));
        field.clear(0);
        field.push(&node, "x", 0);
        assert_eq!(as_memory(&node).property("x"), Some(Value::Int(99)));
    }
}
