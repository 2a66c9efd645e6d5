//! Generated property surfaces for the core control set.
//!
//! Each pair below is one expansion of the [`node_props!`] schema - the
//! fixed shape a code generator would emit per host node type: field name,
//! semantic type, default value and the property the write lands on.
//! Subtypes accumulate their supertype's capability set by embedding its
//! impl and delegating the inherited setters.

use crate::node_props;
use crate::types::Vec2;

node_props! {
    /// Capability set shared by every control node.
    pub trait ControlProps for ControlPropsImpl {
        /// Position in the parent's coordinate space.
        position: Vec2 = Vec2::ZERO => "position",
        /// Whether the node is drawn.
        visible: bool = true => "visible",
    }
}

node_props! {
    /// Text label capabilities.
    pub trait LabelProps: ControlProps for LabelPropsImpl {
        base control: ControlPropsImpl;
        inherit { position: Vec2, visible: bool }
        /// Displayed text.
        text: String = String::new() => "text",
    }
}

node_props! {
    /// Push-button capabilities.
    pub trait ButtonProps: ControlProps for ButtonPropsImpl {
        base control: ControlPropsImpl;
        inherit { position: Vec2, visible: bool }
        /// Button caption.
        text: String = String::new() => "text",
        /// Disabled buttons ignore presses.
        disabled: bool = false => "disabled",
    }
}

node_props! {
    /// Box layout container capabilities.
    pub trait BoxContainerProps: ControlProps for BoxContainerPropsImpl {
        base control: ControlPropsImpl;
        inherit { position: Vec2, visible: bool }
        /// Gap between children.
        separation: i64 = 0 => "separation",
    }
}
