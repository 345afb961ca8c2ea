//! Errors raised while loading or querying bus descriptors.

use crate::descriptor::BusClass;
use crate::role::Role;

/// Errors from bus descriptor loading and role resolution.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// No built-in or file descriptor has this name.
    #[error("unknown bus '{0}'")]
    UnknownBus(String),

    /// A descriptor file names a protocol pod has no generator for.
    #[error("bus '{bus}': unknown protocol '{protocol}'")]
    UnknownProtocol {
        /// Descriptor name.
        bus: String,
        /// The unrecognised protocol name.
        protocol: String,
    },

    /// A descriptor file names a role that does not exist in its protocol.
    #[error("bus '{bus}': '{role}' is not a {protocol} role")]
    UnknownRole {
        /// Descriptor name.
        bus: String,
        /// Protocol of the descriptor.
        protocol: String,
        /// The unrecognised role name.
        role: String,
    },

    /// A descriptor does not map a role its protocol requires.
    #[error("bus '{bus}': {class} side does not define required role '{role}'")]
    MissingRole {
        /// Descriptor name.
        bus: String,
        /// Side of the bus.
        class: BusClass,
        /// The missing role.
        role: Role,
    },

    /// Role lookup on a descriptor that does not define it for that class.
    #[error("bus '{bus}': role '{role}' is not defined for {class}")]
    UndefinedRole {
        /// Descriptor name.
        bus: String,
        /// Side of the bus.
        class: BusClass,
        /// The requested role.
        role: Role,
    },

    /// A descriptor file could not be read.
    #[error("failed to read bus descriptor: {0}")]
    Io(#[from] std::io::Error),

    /// A descriptor file is not valid TOML or misses a field.
    #[error("failed to parse bus descriptor '{path}': {message}")]
    Parse {
        /// File that failed to parse.
        path: String,
        /// Parser message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::WishboneRole;

    #[test]
    fn display_undefined_role() {
        let err = BusError::UndefinedRole {
            bus: "wishbone".into(),
            class: BusClass::Slave,
            role: Role::Wishbone(WishboneRole::ByteEnable),
        };
        assert_eq!(
            err.to_string(),
            "bus 'wishbone': role 'byteen' is not defined for slave"
        );
    }

    #[test]
    fn display_unknown_bus() {
        assert_eq!(BusError::UnknownBus("pcie".into()).to_string(), "unknown bus 'pcie'");
    }
}
