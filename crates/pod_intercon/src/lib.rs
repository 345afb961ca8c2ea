//! Intercon synthesis for pod projects.
//!
//! An Intercon is a generated instance that sits between a bus master and
//! the slaves bound to it. It decodes the master's address into one
//! chip-select per slave, fans clock and reset out, adapts data widths
//! through write lanes and byte-enable decodes, and muxes read data back.
//!
//! Synthesis runs in three steps:
//!
//! 1. [`InterconContext::plan`] reads the project and resolves every
//!    bridged port to its role.
//! 2. A [`BusProtocolGenerator`] turns the context into VHDL text.
//! 3. The commit places the Intercon instance and wires its mirror ports.
//!
//! [`synthesize_intercon`] runs all three after validation;
//! [`write_artifact`] puts the text on disk.

#![warn(missing_docs)]

mod artifact;
mod context;
mod error;
mod generators;
mod mirror;
mod scaffold;
mod synthesize;
mod width;
mod writer;

pub use artifact::{artifact_path, write_artifact, Artifact, ArtifactStatus};
pub use context::{Endpoint, InterconContext, MirrorPort};
pub use error::InterconError;
pub use generators::{
    generator_for, AxiLiteGenerator, BusProtocolGenerator, ClockResetGenerator, GeneratedText,
    Wishbone8Generator, WishboneGenerator,
};
pub use mirror::component_def;
pub use synthesize::{synthesize_all, synthesize_intercon, synthesize_intercon_with};
pub use width::WidthPlan;
