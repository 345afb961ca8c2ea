//! Name-based references between interfaces.

use pod_common::Ident;
use serde::{Deserialize, Serialize};

/// An interface named by `(instance, interface)`.
///
/// References are resolved against the live project when used, so they stay
/// meaningful across instance removal: a reference to a removed instance
/// simply no longer resolves.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct InterfaceRef {
    /// Instance name.
    pub instance: Ident,
    /// Interface name within the instance.
    pub interface: Ident,
}

impl InterfaceRef {
    /// Creates a reference.
    pub fn new(instance: Ident, interface: Ident) -> Self {
        Self {
            instance,
            interface,
        }
    }
}

/// A slave bound to a master, with the id the master issued for it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SlaveBinding {
    /// The bound slave interface.
    pub slave: InterfaceRef,
    /// Id issued by the master at bind time; never reused.
    pub unique_id: u32,
}
