//! Error types for Intercon synthesis.

use std::path::PathBuf;

use pod_bus::Role;
use pod_common::InternalError;
use pod_diagnostics::Diagnostic;
use pod_netlist::NetlistError;

/// Errors that abort the synthesis of one Intercon.
///
/// Other masters are unaffected: `synthesize_all` reports one result per
/// master.
#[derive(Debug, thiserror::Error)]
pub enum InterconError {
    /// Validation found errors; nothing was generated.
    #[error("cannot generate the intercon of {master}: validation found {} error(s)", diagnostics.len())]
    Blocked {
        /// Master interface path.
        master: String,
        /// The error-severity findings.
        diagnostics: Vec<Diagnostic>,
    },

    /// The interface is not a bus master.
    #[error("{0} is not a bus master")]
    NotMaster(String),

    /// A port needed by the generator is missing.
    #[error("{interface} has no port for the {role} role")]
    MissingRole {
        /// Interface path.
        interface: String,
        /// The role that could not be resolved.
        role: Role,
    },

    /// A slave data width the master cannot be adapted to.
    #[error("{slave} is {slave_width} bits wide; {master} ({master_width} bits) cannot adapt to it")]
    UnsupportedWidth {
        /// Master interface path.
        master: String,
        /// Slave interface path.
        slave: String,
        /// Master data width in bits.
        master_width: u32,
        /// Slave data width in bits.
        slave_width: u32,
    },

    /// A slave window the master's address lines cannot reach.
    #[error("{slave} at {base:#x} ({window_bits} address bits) does not fit in a {addr_width}-bit master address")]
    WindowOutOfRange {
        /// Slave interface path.
        slave: String,
        /// Base address of the window.
        base: u64,
        /// Address bits spanned by the window, byte offset included.
        window_bits: u32,
        /// Width of the master address.
        addr_width: u32,
    },

    /// A bus port is wired to something other than its Intercon.
    #[error("{port} is already connected outside its intercon")]
    BoundaryConnected {
        /// Port path.
        port: String,
    },

    /// The Intercon name is held by a user instance.
    #[error("instance {0} exists and was not generated by pod")]
    NameTaken(String),

    /// A netlist operation failed.
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// The netlist is in a state it should never reach.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// Writing the artifact failed.
    #[error("intercon I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_bus::WishboneRole;

    #[test]
    fn missing_role_display() {
        let err = InterconError::MissingRole {
            interface: "cpu00.mwb".into(),
            role: WishboneRole::ByteEnable.into(),
        };
        assert_eq!(err.to_string(), "cpu00.mwb has no port for the byteen role");
    }

    #[test]
    fn blocked_counts_errors() {
        let err = InterconError::Blocked {
            master: "cpu00.mwb".into(),
            diagnostics: Vec::new(),
        };
        assert!(err.to_string().ends_with("validation found 0 error(s)"));
    }
}
