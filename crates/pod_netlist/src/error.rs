//! Errors of netlist mutations and lookups.

use pod_bus::BusError;

use crate::allocmem::AllocError;
use crate::direction::Direction;

/// Broad classification of a [`NetlistError`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Wiring or binding rule violated: direction, force, width, duplicate binding.
    Structural,
    /// Address space rule violated: alignment, overlap, register collision.
    Address,
    /// A name, generic or bus role could not be resolved.
    Resolution,
    /// Internal records disagree, e.g. a connection without its mirror.
    Consistency,
}

/// Errors from [`Project`](crate::Project) operations.
///
/// Every failing mutation leaves the project exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The matrix forbids driving `dest` from `source`.
    #[error("cannot connect {source_pin} ({from}) to {dest_pin} ({to})")]
    IncompatibleDirection {
        /// Source pin path.
        source_pin: String,
        /// Source direction.
        from: Direction,
        /// Destination pin path.
        dest_pin: String,
        /// Destination direction.
        to: Direction,
    },
    /// Connection attempted on a forced port.
    #[error("port {0} is forced and cannot be connected")]
    ForcedPort(String),
    /// Operation requires a port without connections.
    #[error("port {0} is already connected")]
    PortConnected(String),
    /// Port widths differ.
    #[error("width mismatch: {a} is {a_width} bits, {b} is {b_width} bits")]
    WidthMismatch {
        /// First port.
        a: String,
        /// Its width.
        a_width: u32,
        /// Second port.
        b: String,
        /// Its width.
        b_width: u32,
    },
    /// Pin index not below the port width.
    #[error("pin {pin} is out of range for {port} ({width} bits)")]
    PinOutOfRange {
        /// Port path.
        port: String,
        /// Requested pin.
        pin: u32,
        /// Port width.
        width: u32,
    },
    /// A pin cannot be connected to itself.
    #[error("cannot connect {0} to itself")]
    SelfConnection(String),
    /// The two pins are not connected.
    #[error("{0} and {1} are not connected")]
    NotConnected(String, String),
    /// Unconnected values only apply to inputs.
    #[error("port {0} is not an input; only inputs take an unconnected value")]
    NotAnInput(String),
    /// Unconnected value outside `0`/`1`.
    #[error("unconnected value must be 0 or 1, not {0}")]
    InvalidUnconnectedValue(u8),
    /// The slave is already bound.
    #[error("{slave} is already bound to {master}")]
    DuplicateBinding {
        /// Master it is bound to.
        master: String,
        /// The slave.
        slave: String,
    },
    /// The slave is not bound to that master.
    #[error("{slave} is not bound to {master}")]
    NotBound {
        /// Master.
        master: String,
        /// Slave.
        slave: String,
    },
    /// Interface is not a bus master/slave.
    #[error("{0} is not a bus interface")]
    NotBus(String),
    /// Master and slave speak different buses.
    #[error("bus mismatch: {master} is {master_bus}, {slave} is {slave_bus}")]
    BusMismatch {
        /// Master path.
        master: String,
        /// Master bus.
        master_bus: String,
        /// Slave path.
        slave: String,
        /// Slave bus.
        slave_bus: String,
    },
    /// Interface has the wrong class for the operation.
    #[error("{path} is {actual}, expected {expected}")]
    ClassMismatch {
        /// Interface path.
        path: String,
        /// Its class.
        actual: String,
        /// Class required.
        expected: String,
    },
    /// Interfaces cannot be matched port by port.
    #[error("cannot pair interfaces {a} and {b}: {reason}")]
    InterfaceMismatch {
        /// First interface.
        a: String,
        /// Second interface.
        b: String,
        /// Why.
        reason: String,
    },
    /// Bus auto-connection needs exactly one master of the bus.
    #[error("bus '{bus}' has {count} masters, auto-connect needs exactly one")]
    AmbiguousMaster {
        /// Bus name.
        bus: String,
        /// Number of masters found.
        count: usize,
    },
    /// Another instance already uses the name.
    #[error("an instance named '{0}' already exists")]
    DuplicateName(String),
    /// The name is reserved for automatic numbering.
    #[error("instance name '{name}' is reserved for automatic naming of '{component}'")]
    ReservedName {
        /// Requested name.
        name: String,
        /// Component.
        component: String,
    },
    /// Two ports or interfaces of one definition share a name.
    #[error("duplicate {what} '{name}' in component '{component}'")]
    DuplicateDefinition {
        /// Kind of object.
        what: &'static str,
        /// Name.
        name: String,
        /// Component.
        component: String,
    },
    /// The generic is computed from the netlist and cannot be set.
    #[error("generic {0} is computed and cannot be set")]
    ComputedGeneric(String),
    /// Base address not a multiple of the window size.
    #[error("base address {base:#x} of {slave} is not a multiple of its window size {size:#x}")]
    Misaligned {
        /// Slave path.
        slave: String,
        /// Requested base.
        base: u64,
        /// Window size.
        size: u64,
    },
    /// A slave computed an empty address window.
    #[error("{0} has an empty address window")]
    EmptyWindow(String),
    /// A window that would run past the last 64-bit address.
    #[error("window of {slave} at {base:#x} with size {size:#x} runs past the last address")]
    WindowOutOfRange {
        /// Slave path.
        slave: String,
        /// First byte address.
        base: u64,
        /// Window size.
        size: u64,
    },
    /// No object with this path.
    #[error("no {what} named '{path}'")]
    NotFound {
        /// Kind of object.
        what: &'static str,
        /// Path looked up.
        path: String,
    },
    /// A port width refers to a generic that does not resolve to a number.
    #[error("width of {port} refers to generic '{generic}' which has no numeric value")]
    UnresolvedWidth {
        /// Port path.
        port: String,
        /// Generic name.
        generic: String,
    },
    /// Bus descriptor problem.
    #[error(transparent)]
    Bus(#[from] BusError),
    /// A connection lacks its mirror record.
    #[error("connection {0} -> {1} has no mirror record")]
    Asymmetric(String, String),
    /// A recorded binding points at an interface that does not exist.
    #[error("binding refers to missing interface {0}")]
    DanglingBinding(String),
}

impl NetlistError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        use NetlistError::*;
        match self {
            IncompatibleDirection { .. }
            | ForcedPort(_)
            | PortConnected(_)
            | WidthMismatch { .. }
            | PinOutOfRange { .. }
            | SelfConnection(_)
            | NotConnected(..)
            | NotAnInput(_)
            | InvalidUnconnectedValue(_)
            | DuplicateBinding { .. }
            | NotBound { .. }
            | NotBus(_)
            | BusMismatch { .. }
            | ClassMismatch { .. }
            | InterfaceMismatch { .. }
            | AmbiguousMaster { .. }
            | DuplicateName(_)
            | ReservedName { .. }
            | DuplicateDefinition { .. }
            | ComputedGeneric(_) => ErrorKind::Structural,
            Misaligned { .. } | EmptyWindow(_) | WindowOutOfRange { .. } => ErrorKind::Address,
            NotFound { .. } | UnresolvedWidth { .. } | Bus(_) => ErrorKind::Resolution,
            Asymmetric(..) | DanglingBinding(_) => ErrorKind::Consistency,
        }
    }

    pub(crate) fn from_alloc(err: AllocError, master: String, slave: String) -> Self {
        match err {
            AllocError::Misaligned { base, size } => NetlistError::Misaligned { slave, base, size },
            AllocError::AlreadyBound => NetlistError::DuplicateBinding { master, slave },
            AllocError::NotBound => NetlistError::NotBound { master, slave },
            AllocError::ZeroSize => NetlistError::EmptyWindow(slave),
            AllocError::OutOfRange { base, size } => {
                NetlistError::WindowOutOfRange { slave, base, size }
            }
        }
    }
}
