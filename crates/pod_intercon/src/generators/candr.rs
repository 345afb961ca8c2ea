//! Clock and reset Intercon: the master's clock and reset fanned out to
//! every slave. There is no address decoding.

use pod_bus::{ClockResetRole as C, Protocol};

use super::{BusProtocolGenerator, GeneratedText, Notes};
use crate::context::InterconContext;
use crate::error::InterconError;
use crate::scaffold;
use crate::writer::VhdlWriter;

/// Generator for the clock and reset pseudo-bus.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockResetGenerator;

impl BusProtocolGenerator for ClockResetGenerator {
    fn protocol(&self) -> Protocol {
        Protocol::ClockReset
    }

    fn generate(&self, ctx: &InterconContext) -> Result<GeneratedText, InterconError> {
        let mut w = VhdlWriter::new();
        scaffold::header(&mut w, ctx);
        scaffold::entity(&mut w, ctx);
        scaffold::architecture_head(&mut w, ctx);
        scaffold::begin(&mut w);
        scaffold::clock_reset_fanout(&mut w, ctx, C::Clock, C::Reset, true)?;
        scaffold::architecture_foot(&mut w, ctx);
        log::info!(
            "generated candr intercon {} for {} slave(s)",
            ctx.instance,
            ctx.slaves.len()
        );
        Ok(GeneratedText::new(ctx, w.finish(), None, Notes::default()))
    }
}
