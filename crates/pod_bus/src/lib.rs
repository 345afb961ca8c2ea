//! Bus descriptors: which port type plays which protocol role.
//!
//! A [`BusDescriptor`] maps `(class, role)` pairs to the concrete port-type
//! tag a component uses for that signal, e.g. the Wishbone slave `ack` role
//! is carried by ports tagged `ACK`. Roles are closed per-protocol enums
//! ([`WishboneRole`], [`AxiLiteRole`], [`ClockResetRole`]); descriptor files
//! name them as strings and are rejected at load time if a name is unknown.
//!
//! Descriptors are immutable and shared through a [`BusLibrary`], which loads
//! each name once, either from a built-in definition or from a `<name>.toml`
//! file in a user bus directory.

#![warn(missing_docs)]

pub mod builtin;
pub mod descriptor;
pub mod error;
pub mod library;
pub mod role;

pub use descriptor::{BusClass, BusDescriptor};
pub use error::BusError;
pub use library::BusLibrary;
pub use role::{AxiLiteRole, ClockResetRole, Protocol, Role, WishboneRole};
