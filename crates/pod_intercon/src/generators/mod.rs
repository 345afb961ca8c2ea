//! Protocol generators: one [`BusProtocolGenerator`] per bus protocol.

mod axi4lite;
mod candr;
mod wishbone;
mod wishbone8;

pub use axi4lite::AxiLiteGenerator;
pub use candr::ClockResetGenerator;
pub use wishbone::WishboneGenerator;
pub use wishbone8::Wishbone8Generator;

use pod_bus::Protocol;
use pod_common::ContentHash;
use serde::Serialize;

use crate::context::InterconContext;
use crate::error::InterconError;
use crate::width::WidthPlan;

/// VHDL produced for one Intercon.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedText {
    /// Intercon instance name; also the file stem.
    pub instance: String,
    /// Entity name.
    pub component: String,
    /// Protocol of the bridged bus.
    pub protocol: Protocol,
    /// The VHDL source.
    pub code: String,
    /// Hash of `code`.
    pub content_hash: ContentHash,
    /// Slave widths given a write-data lane.
    pub lanes: Vec<u32>,
    /// Slave widths given a byte-enable decode.
    pub byte_enable_decodes: Vec<u32>,
    /// Optional paths that were skipped, one line each.
    pub notes: Vec<String>,
}

impl GeneratedText {
    fn new(ctx: &InterconContext, code: String, plan: Option<&WidthPlan>, notes: Notes) -> Self {
        Self {
            instance: ctx.instance.clone(),
            component: ctx.component.clone(),
            protocol: ctx.protocol,
            content_hash: ContentHash::from_text(&code),
            code,
            lanes: plan.map(|p| p.lanes.clone()).unwrap_or_default(),
            byte_enable_decodes: plan.map(|p| p.decodes.clone()).unwrap_or_default(),
            notes: notes.0,
        }
    }
}

/// Notes on skipped optional paths, also logged as warnings.
#[derive(Debug, Default)]
struct Notes(Vec<String>);

impl Notes {
    fn note(&mut self, message: String) {
        log::warn!("{message}");
        self.0.push(message);
    }
}

/// Generates the VHDL of an Intercon for one bus protocol.
///
/// Generators are pure: everything they read is in the
/// [`InterconContext`], and they never touch the project.
pub trait BusProtocolGenerator {
    /// The protocol this generator handles.
    fn protocol(&self) -> Protocol;

    /// Generates the Intercon described by `ctx`.
    fn generate(&self, ctx: &InterconContext) -> Result<GeneratedText, InterconError>;
}

/// Returns the generator for `protocol`.
pub fn generator_for(protocol: Protocol) -> Box<dyn BusProtocolGenerator> {
    match protocol {
        Protocol::Wishbone => Box::new(WishboneGenerator),
        Protocol::Wishbone8 => Box::new(Wishbone8Generator),
        Protocol::AxiLite => Box::new(AxiLiteGenerator),
        Protocol::ClockReset => Box::new(ClockResetGenerator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_generator_per_protocol() {
        for protocol in Protocol::ALL {
            assert_eq!(generator_for(protocol).protocol(), protocol);
        }
    }
}
