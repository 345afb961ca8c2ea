//! Interfaces: groups of ports with a role in the system.

use pod_bus::{BusClass, BusDescriptor};
use pod_common::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::allocmem::AllocMem;
use crate::ids::{InstanceId, InterfaceId, PortId};
use crate::register::Register;
use crate::slave::InterfaceRef;

/// What an interface is for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum InterfaceClass {
    /// Bus master.
    Master,
    /// Bus slave.
    Slave,
    /// Clock and reset.
    ClkRst,
    /// Plain signals.
    Gls,
    /// Boundary of a synthesized Intercon.
    Intercon,
}

impl InterfaceClass {
    /// Keyword used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            InterfaceClass::Master => "master",
            InterfaceClass::Slave => "slave",
            InterfaceClass::ClkRst => "clk_rst",
            InterfaceClass::Gls => "gls",
            InterfaceClass::Intercon => "intercon",
        }
    }

    /// Bus side of this class, for master and slave interfaces.
    pub fn bus_class(self) -> Option<BusClass> {
        match self {
            InterfaceClass::Master => Some(BusClass::Master),
            InterfaceClass::Slave => Some(BusClass::Slave),
            _ => None,
        }
    }
}

impl fmt::Display for InterfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown interface class keyword.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown interface class '{0}'")]
pub struct ParseClassError(pub String);

impl FromStr for InterfaceClass {
    type Err = ParseClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(InterfaceClass::Master),
            "slave" => Ok(InterfaceClass::Slave),
            "clk_rst" => Ok(InterfaceClass::ClkRst),
            "gls" => Ok(InterfaceClass::Gls),
            "intercon" => Ok(InterfaceClass::Intercon),
            other => Err(ParseClassError(other.to_string())),
        }
    }
}

/// An interface of an instance.
#[derive(Clone, Debug)]
pub struct Interface {
    /// Id of this interface.
    pub id: InterfaceId,
    /// Interface name, unique within its instance.
    pub name: Ident,
    /// Owning instance.
    pub instance: InstanceId,
    /// Class of the interface.
    pub class: InterfaceClass,
    /// Bus spoken by a master or slave interface.
    pub bus: Option<Arc<BusDescriptor>>,
    /// Ports in declaration order.
    pub ports: Vec<PortId>,
    /// Registers of a slave.
    pub registers: Vec<Register>,
    /// Data width override, in bits.
    pub data_size: Option<u32>,
    /// Base address requested by the user for a slave.
    pub explicit_base: Option<u64>,
    /// Address space of a master.
    pub alloc: Option<AllocMem>,
    /// Master a slave is bound to.
    pub master: Option<InterfaceRef>,
    /// Interfaces fed by a clk_rst interface.
    pub clock_domain: Vec<InterfaceRef>,
    /// clk_rst interface feeding this one.
    pub clock_source: Option<InterfaceRef>,
}

impl Interface {
    /// Name of the bus, if any.
    pub fn bus_name(&self) -> Option<&str> {
        self.bus.as_deref().map(BusDescriptor::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_keywords_roundtrip() {
        for class in [
            InterfaceClass::Master,
            InterfaceClass::Slave,
            InterfaceClass::ClkRst,
            InterfaceClass::Gls,
            InterfaceClass::Intercon,
        ] {
            assert_eq!(class.as_str().parse::<InterfaceClass>(), Ok(class));
        }
        assert!("bridge".parse::<InterfaceClass>().is_err());
    }

    #[test]
    fn only_master_and_slave_have_bus_side() {
        assert_eq!(InterfaceClass::Master.bus_class(), Some(BusClass::Master));
        assert_eq!(InterfaceClass::Slave.bus_class(), Some(BusClass::Slave));
        assert_eq!(InterfaceClass::ClkRst.bus_class(), None);
    }
}
