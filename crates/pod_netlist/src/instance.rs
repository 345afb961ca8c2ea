//! Placed component instances.

use pod_common::Ident;
use serde::{Deserialize, Serialize};

use crate::generic::Generic;
use crate::ids::{InstanceId, InterfaceId};

/// An HDL source file belonging to an instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HdlFile {
    /// Path relative to the component directory.
    pub path: String,
    /// Whether this file holds the instance's top entity.
    pub top: bool,
}

/// A placed copy of a component.
#[derive(Clone, Debug)]
pub struct Instance {
    /// Id of this instance.
    pub id: InstanceId,
    /// Instance name, unique in the project.
    pub name: Ident,
    /// Component this instance was placed from.
    pub component: Ident,
    /// Placement number within the component.
    pub num: u32,
    /// Interfaces in declaration order.
    pub interfaces: Vec<InterfaceId>,
    /// Generics in declaration order.
    pub generics: Vec<Generic>,
    /// HDL sources.
    pub hdl_files: Vec<HdlFile>,
    /// Whether pod synthesized this instance.
    pub generated: bool,
}

impl Instance {
    /// Generic called `name`.
    pub fn generic(&self, name: Ident) -> Option<&Generic> {
        self.generics.iter().find(|g| g.name == name)
    }

    /// Mutable counterpart of [`generic`](Self::generic).
    pub fn generic_mut(&mut self, name: Ident) -> Option<&mut Generic> {
        self.generics.iter_mut().find(|g| g.name == name)
    }
}

/// Returns `true` if `name` is reserved for automatic numbering of
/// `component`: the component name itself, or the component name followed by
/// exactly two digits.
pub fn is_reserved_name(name: &str, component: &str) -> bool {
    match name.strip_prefix(component) {
        Some("") => true,
        Some(rest) => rest.len() == 2 && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Automatic name of placement `num` of `component`.
pub fn auto_name(component: &str, num: u32) -> String {
    format!("{component}{num:02}")
}
