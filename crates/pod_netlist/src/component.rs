//! Component definitions: the templates instances are placed from.
//!
//! Definitions use plain strings; [`Project::add_instance`](crate::Project::add_instance)
//! interns them and checks them when placing.

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::generic::Destination;
use crate::instance::HdlFile;
use crate::interface::InterfaceClass;
use crate::register::Access;

/// Width of a port definition.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum WidthDef {
    /// Fixed width.
    Literal(u32),
    /// Width given by the named generic.
    Generic(String),
}

/// A port of an interface definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortDef {
    /// Port name.
    pub name: String,
    /// Direction.
    pub direction: Direction,
    /// Width.
    pub width: WidthDef,
    /// Bus port-type tag.
    pub port_type: Option<String>,
    /// Whether the port may be wired on a prefix of its pins.
    pub variable: bool,
    /// Level for an unconnected input, `Some(true)` for '1'.
    pub unconnected: Option<bool>,
}

impl PortDef {
    /// A port of fixed width.
    pub fn new(name: impl Into<String>, direction: Direction, width: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            width: WidthDef::Literal(width),
            port_type: None,
            variable: false,
            unconnected: None,
        }
    }

    /// Sets the port-type tag.
    pub fn typed(mut self, port_type: impl Into<String>) -> Self {
        self.port_type = Some(port_type.into());
        self
    }

    /// Takes the width from a generic.
    pub fn sized_by(mut self, generic: impl Into<String>) -> Self {
        self.width = WidthDef::Generic(generic.into());
        self
    }

    /// Marks the port as variable-size.
    pub fn variable(mut self) -> Self {
        self.variable = true;
        self
    }
}

/// A register of a slave interface definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterDef {
    /// Register name.
    pub name: String,
    /// Offset in data words.
    pub offset: u64,
    /// Access mode.
    pub access: Access,
    /// Description.
    pub description: String,
}

/// An interface of a component definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InterfaceDef {
    /// Interface name.
    pub name: String,
    /// Class.
    pub class: InterfaceClass,
    /// Bus descriptor name, for master and slave interfaces.
    pub bus: Option<String>,
    /// Data width override.
    pub data_size: Option<u32>,
    /// Requested base address of a slave.
    pub base: Option<u64>,
    /// Ports.
    pub ports: Vec<PortDef>,
    /// Registers.
    pub registers: Vec<RegisterDef>,
}

impl InterfaceDef {
    /// An interface without ports.
    pub fn new(name: impl Into<String>, class: InterfaceClass) -> Self {
        Self {
            name: name.into(),
            class,
            bus: None,
            data_size: None,
            base: None,
            ports: Vec::new(),
            registers: Vec::new(),
        }
    }

    /// Sets the bus.
    pub fn bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = Some(bus.into());
        self
    }

    /// Adds a port.
    pub fn port(mut self, port: PortDef) -> Self {
        self.ports.push(port);
        self
    }

    /// Adds a read/write register.
    pub fn register(mut self, name: impl Into<String>, offset: u64) -> Self {
        self.registers.push(RegisterDef {
            name: name.into(),
            offset,
            access: Access::Both,
            description: String::new(),
        });
        self
    }
}

/// How a computed generic gets its value.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GenericOpDef {
    /// Real size of the named port.
    RealSizeOf(String),
}

/// A generic of a component definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenericDef {
    /// Name.
    pub name: String,
    /// Default value.
    pub value: String,
    /// HDL type.
    pub ty: String,
    /// Computation, if derived from the netlist.
    pub op: Option<GenericOpDef>,
    /// Whether the user may change it.
    pub public: bool,
    /// Export target.
    pub destination: Destination,
    /// Description.
    pub description: String,
}

impl GenericDef {
    /// A public `natural` generic.
    pub fn natural(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            ty: "natural".to_string(),
            op: None,
            public: true,
            destination: Destination::Fpga,
            description: String::new(),
        }
    }
}

/// A component definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentDef {
    /// Component name.
    pub name: String,
    /// Interfaces.
    pub interfaces: Vec<InterfaceDef>,
    /// Generics.
    pub generics: Vec<GenericDef>,
    /// HDL sources.
    pub hdl_files: Vec<HdlFile>,
}

impl ComponentDef {
    /// An empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interfaces: Vec::new(),
            generics: Vec::new(),
            hdl_files: Vec::new(),
        }
    }

    /// Adds an interface.
    pub fn interface(mut self, interface: InterfaceDef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Adds a generic.
    pub fn generic(mut self, generic: GenericDef) -> Self {
        self.generics.push(generic);
        self
    }
}
