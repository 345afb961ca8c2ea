//! Parsing and validation of `pod.toml` project files.
//!
//! A project file names the project, lists component instances with their
//! interfaces and ports, and records the bindings, connections, clock
//! domains and forced ports that assemble them. This crate only produces a
//! strongly-typed [`ProjectConfig`]; turning it into a netlist is the
//! caller's job.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_paths, ResolvedPaths};
pub use types::*;
