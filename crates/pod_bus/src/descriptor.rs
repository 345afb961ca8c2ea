//! The bus descriptor record and its on-disk form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::BusError;
use crate::role::{Protocol, Role};

/// Side of a bus an interface sits on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum BusClass {
    /// Initiates transactions and owns the address space.
    Master,
    /// Occupies a window in a master's address space.
    Slave,
}

impl fmt::Display for BusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusClass::Master => f.write_str("master"),
            BusClass::Slave => f.write_str("slave"),
        }
    }
}

/// Immutable description of one bus: its protocol, native width and the
/// port-type tag for every role on each side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusDescriptor {
    name: String,
    protocol: Protocol,
    data_size: u32,
    reset_active_low: bool,
    master: BTreeMap<Role, String>,
    slave: BTreeMap<Role, String>,
}

impl BusDescriptor {
    /// Builds a descriptor, checking that every required role is mapped.
    pub fn new(
        name: impl Into<String>,
        protocol: Protocol,
        data_size: u32,
        master: BTreeMap<Role, String>,
        slave: BTreeMap<Role, String>,
    ) -> Result<Self, BusError> {
        let desc = Self {
            name: name.into(),
            protocol,
            data_size,
            reset_active_low: protocol.reset_active_low(),
            master,
            slave,
        };
        for class in [BusClass::Master, BusClass::Slave] {
            for role in protocol.required_roles(class) {
                if !desc.side(class).contains_key(&role) {
                    return Err(BusError::MissingRole {
                        bus: desc.name.clone(),
                        class,
                        role,
                    });
                }
            }
        }
        Ok(desc)
    }

    /// Parses a descriptor from the TOML file format.
    ///
    /// ```toml
    /// name = "wishbone"
    /// protocol = "wishbone"
    /// data_size = 32
    /// reset_active_low = false
    /// [master]
    /// clock = "CLK"
    /// [slave]
    /// clock = "CLK"
    /// ```
    pub fn from_toml(content: &str, path: &str) -> Result<Self, BusError> {
        let file: DescriptorFile = toml::from_str(content).map_err(|e| BusError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let protocol =
            Protocol::from_name(&file.protocol).ok_or_else(|| BusError::UnknownProtocol {
                bus: file.name.clone(),
                protocol: file.protocol.clone(),
            })?;
        let master = parse_side(&file.name, protocol, file.master)?;
        let slave = parse_side(&file.name, protocol, file.slave)?;
        let data_size = file
            .data_size
            .unwrap_or_else(|| protocol.native_data_size());
        let desc = Self::new(file.name, protocol, data_size, master, slave)?;
        Ok(match file.reset_active_low {
            Some(low) => desc.with_reset_active_low(low),
            None => desc,
        })
    }

    /// Overrides the reset level the protocol defaults to.
    pub fn with_reset_active_low(mut self, low: bool) -> Self {
        self.reset_active_low = low;
        self
    }

    /// Descriptor name, e.g. `wishbone`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Protocol spoken on this bus.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Native data width in bits.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Whether the reset role is asserted at `'0'`.
    pub fn reset_active_low(&self) -> bool {
        self.reset_active_low
    }

    fn side(&self, class: BusClass) -> &BTreeMap<Role, String> {
        match class {
            BusClass::Master => &self.master,
            BusClass::Slave => &self.slave,
        }
    }

    /// Port-type tag carrying `role` on the `class` side.
    pub fn resolve(&self, class: BusClass, role: impl Into<Role>) -> Result<&str, BusError> {
        let role = role.into();
        self.side(class)
            .get(&role)
            .map(String::as_str)
            .ok_or_else(|| BusError::UndefinedRole {
                bus: self.name.clone(),
                class,
                role,
            })
    }

    /// Role played by ports tagged `port_type` on the `class` side.
    pub fn role_of(&self, class: BusClass, port_type: &str) -> Option<Role> {
        self.side(class)
            .iter()
            .find(|(_, ty)| ty.as_str() == port_type)
            .map(|(role, _)| *role)
    }

    /// All `(role, port type)` pairs of one side, in role order.
    pub fn roles(&self, class: BusClass) -> impl Iterator<Item = (Role, &str)> {
        self.side(class).iter().map(|(r, t)| (*r, t.as_str()))
    }
}

#[derive(Deserialize)]
struct DescriptorFile {
    name: String,
    protocol: String,
    #[serde(default)]
    data_size: Option<u32>,
    #[serde(default)]
    reset_active_low: Option<bool>,
    #[serde(default)]
    master: BTreeMap<String, String>,
    #[serde(default)]
    slave: BTreeMap<String, String>,
}

fn parse_side(
    bus: &str,
    protocol: Protocol,
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<Role, String>, BusError> {
    raw.into_iter()
        .map(|(name, ty)| {
            protocol
                .parse_role(&name)
                .map(|role| (role, ty))
                .ok_or_else(|| BusError::UnknownRole {
                    bus: bus.to_string(),
                    protocol: protocol.name().to_string(),
                    role: name,
                })
        })
        .collect()
}
