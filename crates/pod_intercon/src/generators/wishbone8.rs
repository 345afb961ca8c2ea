//! 8-bit Wishbone Intercon. Master and slaves share one width, so the
//! master's address and data reach the slaves unchanged.

use pod_bus::{Protocol, WishboneRole as W};

use super::wishbone::{control_master, control_slaves, MasterSignals};
use super::{BusProtocolGenerator, GeneratedText, Notes};
use crate::context::InterconContext;
use crate::error::InterconError;
use crate::scaffold::{self, ChipSelect};
use crate::width::WidthPlan;
use crate::writer::{slice, VhdlWriter};

/// Generator for 8-bit Wishbone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wishbone8Generator;

impl BusProtocolGenerator for Wishbone8Generator {
    fn protocol(&self) -> Protocol {
        Protocol::Wishbone8
    }

    fn generate(&self, ctx: &InterconContext) -> Result<GeneratedText, InterconError> {
        let plan = WidthPlan::exact(&ctx.master, &ctx.slaves)?;
        let m = MasterSignals::resolve(&ctx.master)?;
        let mut notes = Notes::default();
        let mut w = VhdlWriter::new();

        scaffold::header(&mut w, ctx);
        scaffold::entity(&mut w, ctx);
        scaffold::architecture_head(&mut w, ctx);
        for slave in &ctx.slaves {
            scaffold::declare_cs(&mut w, &slave.cs_name());
        }
        scaffold::begin(&mut w);

        scaffold::clock_reset_fanout(&mut w, ctx, W::Clock, W::Reset, false)?;

        w.blank();
        w.banner("Address decoding");
        for slave in &ctx.slaves {
            if let Some(adr) = slave.signal(W::Address) {
                let source = if adr.width == 1 {
                    format!("{}(0)", m.adr)
                } else {
                    slice(m.adr, adr.width - 1, 0)
                };
                w.assign(&adr.name, source);
            }
        }
        w.blank();
        let selects = ctx
            .slaves
            .iter()
            .map(|s| {
                Ok(ChipSelect {
                    name: s.cs_name(),
                    condition: scaffold::address_match(m.adr, m.adr_width, s, m.stb)?,
                })
            })
            .collect::<Result<Vec<_>, InterconError>>()?;
        scaffold::decode_process(&mut w, m.clk, m.rst, ctx.reset_level, &[m.adr], &selects);

        control_slaves(&mut w, ctx, &m, &plan, &mut notes)?;
        control_master(&mut w, ctx, &m, false)?;

        scaffold::architecture_foot(&mut w, ctx);
        log::info!(
            "generated wishbone8 intercon {} for {} slave(s)",
            ctx.instance,
            ctx.slaves.len()
        );
        Ok(GeneratedText::new(ctx, w.finish(), Some(&plan), notes))
    }
}
