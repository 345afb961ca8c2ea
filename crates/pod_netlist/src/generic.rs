//! Instance generics.

use pod_common::Ident;
use serde::{Deserialize, Serialize};

/// Where a generic's value is exported.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Only into the HDL instantiation.
    #[default]
    Fpga,
    /// Only into the generated driver.
    Driver,
    /// Both.
    Both,
}

/// How a computed generic derives its value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GenericOp {
    /// Number of wired pins of the named port (highest connected pin + 1).
    RealSizeOf(Ident),
}

/// A named parameter of an instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Generic {
    /// Generic name.
    pub name: Ident,
    /// Stored value; ignored when `op` is set.
    pub value: String,
    /// HDL type, e.g. `natural` or `std_logic_vector`.
    pub ty: String,
    /// Computation, for generics derived from the netlist.
    pub op: Option<GenericOp>,
    /// Whether the user may change the value.
    pub public: bool,
    /// Export target.
    pub destination: Destination,
    /// Free-form description.
    pub description: String,
}

impl Generic {
    /// A plain `natural` generic with a fixed value.
    pub fn natural(name: Ident, value: u64) -> Self {
        Self {
            name,
            value: value.to_string(),
            ty: "natural".to_string(),
            op: None,
            public: true,
            destination: Destination::Fpga,
            description: String::new(),
        }
    }

    /// Parses the stored value as an integer, accepting `0x` hex.
    pub fn as_integer(&self) -> Option<u64> {
        parse_integer(&self.value)
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer.
pub fn parse_integer(text: &str) -> Option<u64> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
