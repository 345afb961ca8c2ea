//! The netlist of a system under assembly.
//!
//! A [`Project`] owns component instances, their interfaces and ports, the
//! pin-level [`ConnectionGraph`], and per-master address allocation
//! ([`AllocMem`]). Objects are stored in arenas and referenced by
//! [`InstanceId`], [`InterfaceId`] and [`PortId`]; a pin is a
//! [`PinRef`] (port id plus bit index).
//!
//! Every mutation validates completely before changing anything, so a
//! failed `connect`, `bind` or `set_base_address` leaves the project as it
//! was. Errors are [`NetlistError`]s, classified by [`ErrorKind`].

#![warn(missing_docs)]

pub mod allocmem;
pub mod arena;
pub mod binding;
pub mod component;
pub mod direction;
pub mod error;
pub mod generic;
pub mod graph;
pub mod ids;
pub mod instance;
pub mod interface;
pub mod pin;
pub mod port;
pub mod project;
pub mod register;
pub mod slave;
mod wiring;

#[cfg(any(test, feature = "testing"))]
pub mod fixtures;

pub use allocmem::{AllocError, AllocMem, MapEntry, Owner, Window};
pub use arena::{Arena, ArenaId};
pub use binding::{MapRow, RegisterRow, VOID_OWNER};
pub use component::{
    ComponentDef, GenericDef, GenericOpDef, InterfaceDef, PortDef, RegisterDef, WidthDef,
};
pub use direction::{Direction, ParseDirectionError};
pub use error::{ErrorKind, NetlistError};
pub use generic::{parse_integer, Destination, Generic, GenericOp};
pub use graph::{ConnectionGraph, GraphError};
pub use ids::{InstanceId, InterfaceId, PortId};
pub use instance::{HdlFile, Instance};
pub use interface::{Interface, InterfaceClass, ParseClassError};
pub use pin::{Connection, PinRef};
pub use port::{Force, ParseForceError, Port, Width};
pub use project::Project;
pub use register::{Access, ParseAccessError, Register};
pub use slave::{InterfaceRef, SlaveBinding};
