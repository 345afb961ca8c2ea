//! Registers exposed inside a slave's address window.

use std::fmt;
use std::str::FromStr;

use pod_common::Ident;
use serde::{Deserialize, Serialize};

/// Access mode of a register.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Read only.
    Read,
    /// Write only.
    Write,
    /// Read and write.
    #[default]
    Both,
}

impl Access {
    /// Keyword used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::Both => "both",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an access keyword other than `read`, `write` or `both`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("register access must be read, write or both, not '{0}'")]
pub struct ParseAccessError(pub String);

impl FromStr for Access {
    type Err = ParseAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Access::Read),
            "write" => Ok(Access::Write),
            "both" => Ok(Access::Both),
            other => Err(ParseAccessError(other.to_string())),
        }
    }
}

/// A register of a slave interface, at `offset` words from the window base.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Register {
    /// Register name.
    pub name: Ident,
    /// Offset in data words from the slave's base address.
    pub offset: u64,
    /// Access mode.
    pub access: Access,
    /// Free-form description.
    pub description: String,
}

impl Register {
    /// Absolute byte address of this register for a slave at `base` whose
    /// data words are `data_size` bits wide.
    pub fn address(&self, base: u64, data_size: u32) -> u64 {
        base + self.offset * u64::from((data_size / 8).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_scales_with_word_size() {
        let reg = Register {
            name: Ident::from_raw(0),
            offset: 3,
            access: Access::Both,
            description: String::new(),
        };
        assert_eq!(reg.address(0x10, 16), 0x16);
        assert_eq!(reg.address(0x10, 32), 0x1c);
        assert_eq!(reg.address(0x10, 8), 0x13);
    }

    #[test]
    fn access_keywords() {
        assert_eq!("read".parse::<Access>(), Ok(Access::Read));
        assert_eq!(Access::Both.to_string(), "both");
        assert!("rw".parse::<Access>().is_err());
    }
}
