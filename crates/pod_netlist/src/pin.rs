//! Pin identity and the external connection record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::PortId;

/// One bit of a port, identified by the port's stable id and the bit index.
///
/// Pins have no storage of their own: a pin exists once it is referenced by a
/// connection, and its links live in the project's
/// [`ConnectionGraph`](crate::graph::ConnectionGraph).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PinRef {
    /// Owning port.
    pub port: PortId,
    /// Bit index within the port.
    pub index: u32,
}

impl PinRef {
    /// Pin `index` of `port`.
    pub fn new(port: PortId, index: u32) -> Self {
        Self { port, index }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port#{}[{}]", self.port.as_raw(), self.index)
    }
}

/// A connection as seen from one endpoint: where the other end is.
///
/// Every link yields two records, one on each endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Instance of the other endpoint.
    pub instance_dest: String,
    /// Interface of the other endpoint.
    pub interface_dest: String,
    /// Port of the other endpoint.
    pub port_dest: String,
    /// Pin index of the other endpoint.
    pub pin_dest: u32,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}[{}]",
            self.instance_dest, self.interface_dest, self.port_dest, self.pin_dest
        )
    }
}
