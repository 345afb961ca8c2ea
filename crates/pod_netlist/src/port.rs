//! Ports: named groups of pins with a direction and a width.

use pod_common::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::direction::Direction;
use crate::ids::{InterfaceId, PortId};

/// Width of a port: a literal, or the name of a generic of the owning instance.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Width {
    /// Fixed number of bits.
    Literal(u32),
    /// Value of the named generic.
    Generic(Ident),
}

/// Constant a forced port is tied to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Force {
    /// Tied to '0'.
    Gnd,
    /// Tied to '1'.
    Vcc,
    /// Explicitly left undefined.
    Undef,
}

impl Force {
    /// Whether the force drives an actual logic level.
    pub fn is_defined(self) -> bool {
        !matches!(self, Force::Undef)
    }

    /// Keyword used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Force::Gnd => "gnd",
            Force::Vcc => "vcc",
            Force::Undef => "undef",
        }
    }
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a force keyword other than `gnd`, `vcc` or `undef`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("force value must be gnd, vcc or undef, not '{0}'")]
pub struct ParseForceError(pub String);

impl FromStr for Force {
    type Err = ParseForceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gnd" => Ok(Force::Gnd),
            "vcc" => Ok(Force::Vcc),
            "undef" => Ok(Force::Undef),
            other => Err(ParseForceError(other.to_string())),
        }
    }
}

/// A port of an interface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Port {
    /// Id of this port.
    pub id: PortId,
    /// Port name, unique within its instance.
    pub name: Ident,
    /// Owning interface.
    pub interface: InterfaceId,
    /// Direction seen from the component.
    pub direction: Direction,
    /// Width, possibly generic-dependent.
    pub width: Width,
    /// Tag matched against bus descriptor port types.
    pub port_type: Option<String>,
    /// Whether the port may be wired on a prefix of its pins only.
    pub variable: bool,
    /// Constant the port is tied to instead of being connected.
    pub force: Option<Force>,
    /// Level an unconnected "in" port is tied to; `None` means '0'.
    pub unconnected: Option<bool>,
}

impl Port {
    /// Level applied when this input is left unconnected, as a VHDL literal.
    pub fn unconnected_value(&self) -> char {
        if self.unconnected == Some(true) {
            '1'
        } else {
            '0'
        }
    }

    /// Returns `true` if the port is tied to a constant.
    pub fn is_forced(&self) -> bool {
        self.force.is_some()
    }

    /// Returns `true` if the port is forced to gnd or vcc.
    pub fn is_force_defined(&self) -> bool {
        self.force.is_some_and(Force::is_defined)
    }
}
