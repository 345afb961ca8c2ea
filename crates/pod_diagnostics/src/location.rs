//! Object paths that locate a diagnostic inside the netlist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path to a netlist object: `instance.interface.port[pin]`, any suffix optional.
///
/// An empty location refers to the project as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Instance name.
    pub instance: Option<String>,
    /// Interface name within the instance.
    pub interface: Option<String>,
    /// Port name within the interface.
    pub port: Option<String>,
    /// Pin index within the port.
    pub pin: Option<u32>,
}

impl Location {
    /// The project as a whole.
    pub const PROJECT: Location = Location {
        instance: None,
        interface: None,
        port: None,
        pin: None,
    };

    /// Location of an instance.
    pub fn instance(instance: impl Into<String>) -> Self {
        Self {
            instance: Some(instance.into()),
            ..Self::default()
        }
    }

    /// Location of an interface.
    pub fn interface(instance: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            interface: Some(interface.into()),
            ..Self::instance(instance)
        }
    }

    /// Location of a port.
    pub fn port(
        instance: impl Into<String>,
        interface: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            port: Some(port.into()),
            ..Self::interface(instance, interface)
        }
    }

    /// Narrows a port location down to one pin.
    pub fn with_pin(mut self, pin: u32) -> Self {
        self.pin = Some(pin);
        self
    }

    /// Returns `true` if this location names no object.
    pub fn is_project(&self) -> bool {
        self.instance.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(instance) = &self.instance else {
            return write!(f, "<project>");
        };
        write!(f, "{instance}")?;
        if let Some(interface) = &self.interface {
            write!(f, ".{interface}")?;
        }
        if let Some(port) = &self.port {
            write!(f, ".{port}")?;
        }
        if let Some(pin) = self.pin {
            write!(f, "[{pin}]")?;
        }
        Ok(())
    }
}

/// A secondary location attached to a diagnostic, with a short message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Related {
    /// The related object.
    pub location: Location,
    /// Why it is related, e.g. "overlaps this window".
    pub message: String,
}

impl Related {
    /// Creates a related location.
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}
