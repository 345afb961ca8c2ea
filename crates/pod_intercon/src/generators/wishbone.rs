//! Wishbone Intercon with width adaptation toward narrower slaves.
//!
//! A narrow slave sees one slice of the master's data word at a time. The
//! master's byte enables pick the slice: they select the write lane, rebuild
//! the low address bits the master leaves at zero, and place the slave's
//! read data back in the master's word.

use pod_bus::{Protocol, WishboneRole as W};

use super::{BusProtocolGenerator, GeneratedText, Notes};
use crate::context::{byte_shift, Endpoint, InterconContext};
use crate::error::InterconError;
use crate::scaffold::{self, ChipSelect};
use crate::width::{byte_enable_name, WidthPlan};
use crate::writer::{binary, slice, VhdlWriter};

/// Master address as seen by the slaves, low bits rebuilt.
const ADDRESS: &str = "wbm_address_s";

/// Generator for 32-bit (and wider) Wishbone.
#[derive(Debug, Clone, Copy, Default)]
pub struct WishboneGenerator;

/// Mirror names of the master's Wishbone signals.
pub(super) struct MasterSignals<'a> {
    pub clk: &'a str,
    pub rst: &'a str,
    pub adr: &'a str,
    pub adr_width: u32,
    pub dat_o: &'a str,
    pub dat_i: &'a str,
    pub sel: Option<&'a str>,
    pub stb: &'a str,
    pub cyc: &'a str,
    pub we: &'a str,
    pub ack: &'a str,
}

impl<'a> MasterSignals<'a> {
    pub fn resolve(master: &'a Endpoint) -> Result<Self, InterconError> {
        Ok(Self {
            clk: master.name_of(W::Clock)?,
            rst: master.name_of(W::Reset)?,
            adr: master.name_of(W::Address)?,
            adr_width: master.require(W::Address)?.width,
            dat_o: master.name_of(W::DataOut)?,
            dat_i: master.name_of(W::DataIn)?,
            sel: master.signal(W::ByteEnable).map(|p| p.name.as_str()),
            stb: master.name_of(W::Strobe)?,
            cyc: master.name_of(W::Cycle)?,
            we: master.name_of(W::Write)?,
            ack: master.name_of(W::Ack)?,
        })
    }
}

impl BusProtocolGenerator for WishboneGenerator {
    fn protocol(&self) -> Protocol {
        Protocol::Wishbone
    }

    fn generate(&self, ctx: &InterconContext) -> Result<GeneratedText, InterconError> {
        let plan = WidthPlan::new(&ctx.master, &ctx.slaves, W::DataIn)?;
        let m = MasterSignals::resolve(&ctx.master)?;
        let sel = m.sel;
        if sel.is_none() && plan.adapts() {
            return Err(InterconError::MissingRole {
                interface: ctx.master.path(),
                role: W::ByteEnable.into(),
            });
        }
        let mut notes = Notes::default();
        let mut w = VhdlWriter::new();

        scaffold::header(&mut w, ctx);
        scaffold::entity(&mut w, ctx);
        scaffold::architecture_head(&mut w, ctx);
        plan.declare(&mut w);
        w.signal(
            ADDRESS,
            &format!("std_logic_vector({} downto 0)", m.adr_width - 1),
        );
        for slave in &ctx.slaves {
            scaffold::declare_cs(&mut w, &slave.cs_name());
            if slave.has(W::DataOut) {
                w.signal(
                    &slave.readdata_name(),
                    &format!("std_logic_vector({} downto 0)", plan.master - 1),
                );
            }
        }
        scaffold::begin(&mut w);

        if let Some(sel) = sel {
            plan.write_lanes(&mut w, m.dat_o, sel);
        }
        rebuild_address(&mut w, &plan, &m, sel);
        if let Some(sel) = sel {
            plan.write_byte_enables(&mut w, sel);
        }
        scaffold::clock_reset_fanout(&mut w, ctx, W::Clock, W::Reset, false)?;

        w.blank();
        w.banner("Address decoding");
        for slave in &ctx.slaves {
            if let Some(adr) = slave.signal(W::Address) {
                let shift = slave.byte_shift();
                let source = if adr.width == 1 {
                    format!("{ADDRESS}({shift})")
                } else {
                    slice(ADDRESS, adr.width + shift - 1, shift)
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
                    condition: scaffold::address_match(ADDRESS, m.adr_width, s, m.stb)?,
                })
            })
            .collect::<Result<Vec<_>, InterconError>>()?;
        scaffold::decode_process(&mut w, m.clk, m.rst, ctx.reset_level, &[ADDRESS], &selects);

        control_slaves(&mut w, ctx, &m, &plan, &mut notes)?;
        control_master(&mut w, ctx, &m, true)?;
        read_data(&mut w, ctx, &plan, sel);

        scaffold::architecture_foot(&mut w, ctx);
        log::info!(
            "generated wishbone intercon {} for {} slave(s)",
            ctx.instance,
            ctx.slaves.len()
        );
        Ok(GeneratedText::new(ctx, w.finish(), Some(&plan), notes))
    }
}

/// Rebuilds the low address bits from the byte enables when some slave is
/// narrower than the master.
fn rebuild_address(w: &mut VhdlWriter, plan: &WidthPlan, m: &MasterSignals<'_>, sel: Option<&str>) {
    let shift = byte_shift(plan.master);
    let Some(sel) = sel.filter(|_| plan.adapts() && shift > 0 && m.adr_width > shift) else {
        w.assign(ADDRESS, m.adr);
        return;
    };
    let top = m.adr_width - 1;
    w.assign(&slice(ADDRESS, top, shift), slice(m.adr, top, shift));
    let mut branches = Vec::new();
    for &width in &plan.decodes {
        for i in 0..plan.slices(width) {
            let offset = u64::from(i * width / 8);
            branches.push((
                format!("\"{}\"", binary(offset, shift)),
                format!("{sel} = {}", plan.pattern(width, i)),
            ));
        }
    }
    w.select(&slice(ADDRESS, shift - 1, 0), &branches, "(others => '0')");
    w.blank();
}

/// Strobe, cycle, write enable, write data and byte enables of each slave.
///
/// Shared with the 8-bit generator, whose plan has no lanes.
pub(super) fn control_slaves(
    w: &mut VhdlWriter,
    ctx: &InterconContext,
    m: &MasterSignals<'_>,
    plan: &WidthPlan,
    notes: &mut Notes,
) -> Result<(), InterconError> {
    w.banner("Control signals to slave");
    for slave in &ctx.slaves {
        let cs = slave.cs_name();
        w.blank();
        w.comment(format!("for {}", slave.instance));
        w.assign(slave.name_of(W::Strobe)?, scaffold::gated(m.stb, &cs));
        w.assign(slave.name_of(W::Cycle)?, scaffold::gated(m.cyc, &cs));

        let din = slave.signal(W::DataIn);
        let dout = slave.signal(W::DataOut);
        match (slave.signal(W::Write), din, dout) {
            (Some(we), Some(_), None) => w.assign(&we.name, "'1'"),
            (Some(we), None, Some(_)) => w.assign(&we.name, "'0'"),
            (Some(we), _, _) => w.assign(&we.name, scaffold::gated(m.we, &cs)),
            (None, Some(_), Some(_)) => notes.note(format!(
                "{} has no write enable; reads and writes reach it alike",
                slave.path()
            )),
            (None, _, _) => {}
        }
        match din {
            Some(din) => {
                let data = plan.lane_or(slave.data_size, m.dat_o);
                w.assign(&din.name, scaffold::gated_bus(&data, m.we, &cs));
            }
            None => notes.note(format!("{} is read-only; write path skipped", slave.path())),
        }
        if dout.is_none() {
            notes.note(format!("{} is write-only; read path skipped", slave.path()));
        }
        if let Some(slave_sel) = slave.signal(W::ByteEnable) {
            match m.sel {
                Some(_) if plan.decodes.contains(&slave.data_size) => {
                    w.assign(&slave_sel.name, byte_enable_name(slave.data_size));
                }
                Some(sel) => w.assign(&slave_sel.name, sel),
                None => {
                    notes.note(format!(
                        "{} has byte enables but its master does not; all lanes enabled",
                        slave.path()
                    ));
                    w.assign(&slave_sel.name, "(others => '1')");
                }
            }
        }
    }
    Ok(())
}

/// Read data and acknowledge toward the master.
///
/// With `rebuilt`, read data comes from the per-slave `readdata_s` signals;
/// otherwise straight from the slaves' data outputs.
pub(super) fn control_master(
    w: &mut VhdlWriter,
    ctx: &InterconContext,
    m: &MasterSignals<'_>,
    rebuilt: bool,
) -> Result<(), InterconError> {
    w.blank();
    w.blank();
    w.banner("Control signal for master");
    let mut branches = Vec::new();
    for slave in &ctx.slaves {
        if let Some(dout) = slave.signal(W::DataOut) {
            let value = if rebuilt {
                slave.readdata_name()
            } else {
                dout.name.clone()
            };
            branches.push((value, scaffold::selected(&slave.cs_name())));
        }
    }
    w.select(m.dat_i, &branches, "(others => '0')");

    let mut acks = Vec::with_capacity(ctx.slaves.len());
    for slave in &ctx.slaves {
        acks.push(scaffold::fan_in_term(slave.name_of(W::Ack)?, &slave.cs_name()));
    }
    w.or_reduce(m.ack, &acks);
    Ok(())
}

/// Places each slave's read data in the master's word: as is for a full
/// width slave, in the slice the byte enables pick for a narrow one.
fn read_data(
    w: &mut VhdlWriter,
    ctx: &InterconContext,
    plan: &WidthPlan,
    sel: Option<&str>,
) {
    let full = plan.master;
    for slave in &ctx.slaves {
        let Some(dout) = slave.signal(W::DataOut) else {
            continue;
        };
        let target = slave.readdata_name();
        let width = slave.data_size;
        match sel {
            Some(sel) if width < full => {
                let count = plan.slices(width);
                let branches: Vec<(String, String)> = (0..count - 1)
                    .map(|i| {
                        let cond = format!("{sel} = {}", plan.pattern(width, i));
                        (plan.placed(&dout.name, width, i), cond)
                    })
                    .collect();
                w.select(&target, &branches, &plan.placed(&dout.name, width, count - 1));
            }
            _ => w.assign(&target, &dout.name),
        }
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::{fixtures, Project};

    fn project(slaves: &[(u32, u32)]) -> (Project, InterconContext) {
        let mut p = Project::new("demo");
        let cpu = p.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let m = p.interface_named(cpu, "mwb").unwrap();
        for &(addr, data) in slaves {
            let ram = p.add_instance(&fixtures::wb_slave("ram", addr, data), None).unwrap();
            let s = p.interface_named(ram, "swb").unwrap();
            p.bind(m, s).unwrap();
        }
        let ctx = InterconContext::plan(&p, m).unwrap();
        (p, ctx)
    }

    #[test]
    fn same_width_has_no_lane() {
        let (_, ctx) = project(&[(4, 32)]);
        let text = WishboneGenerator.generate(&ctx).unwrap();
        assert!(text.lanes.is_empty());
        assert!(text.byte_enable_decodes.is_empty());
        assert!(!text.code.contains("writedata"));
        assert!(!text.code.contains("byte_enable"));
        assert!(text.code.contains("    wbm_address_s <= cpu00_wbm_adr;\n"));
        assert!(text.code.contains("    ram00_wbs_adr <= wbm_address_s(5 downto 2);\n"));
        assert!(text
            .code
            .contains("ram00_wbs_dat_i <= cpu00_wbm_dat_o when (cpu00_wbm_we and ram00_swb_cs ) = '1' else (others => '0');"));
        assert!(text.code.contains("    ram00_swb_readdata_s <= ram00_wbs_dat_o;\n"));
    }

    #[test]
    fn half_width_has_one_lane_and_one_decode() {
        let (_, ctx) = project(&[(4, 16)]);
        let text = WishboneGenerator.generate(&ctx).unwrap();
        assert_eq!(text.lanes, [16]);
        assert_eq!(text.byte_enable_decodes, [16]);
        assert_eq!(text.code.matches("signal writedata").count(), 1);
        assert_eq!(text.code.matches("signal byte_enable").count(), 1);
        assert!(text.code.contains(
            "    writedata16_s <= cpu00_wbm_dat_o(15 downto 0) when cpu00_wbm_sel = \"0011\" else\n        cpu00_wbm_dat_o(31 downto 16);\n"
        ));
        assert!(text.code.contains(
            "    wbm_address_s(1 downto 0) <= \"00\" when cpu00_wbm_sel = \"0011\" else\n        \"10\" when cpu00_wbm_sel = \"1100\" else\n        (others => '0');\n"
        ));
        assert!(text.code.contains(
            "    ram00_swb_readdata_s <= (31 downto 16 => '0') & ram00_wbs_dat_o when cpu00_wbm_sel = \"0011\" else\n        ram00_wbs_dat_o & (15 downto 0 => '0');\n"
        ));
        assert!(text.code.contains("    ram00_wbs_adr <= wbm_address_s(4 downto 1);\n"));
    }

    #[test]
    fn decode_compares_base_bits() {
        let (_, ctx) = project(&[(4, 32), (4, 32)]);
        let text = WishboneGenerator.generate(&ctx).unwrap();
        assert!(text.code.contains(
            "if wbm_address_s(15 downto 6)=\"0000000000\" and cpu00_wbm_stb='1' then"
        ));
        assert!(text.code.contains(
            "if wbm_address_s(15 downto 6)=\"0000000001\" and cpu00_wbm_stb='1' then"
        ));
        assert!(text.code.contains("decodeproc : process(cpu00_wbm_clk, cpu00_wbm_rst, wbm_address_s)"));
        assert!(text.code.contains(
            "    cpu00_wbm_ack <= (ram00_wbs_ack and ram00_swb_cs) or\n        (ram01_wbs_ack and ram01_swb_cs);\n"
        ));
        assert!(text.code.contains("    ram01_wbs_clk <= cpu00_wbm_clk;\n"));
        assert!(text.code.trim_end().ends_with("end architecture cpu00_mwb_1;"));
    }

    #[test]
    fn no_slave_drives_zeros() {
        let (_, ctx) = project(&[]);
        let text = WishboneGenerator.generate(&ctx).unwrap();
        assert!(text.code.contains("    cpu00_wbm_ack <= '0';\n"));
        assert!(text.code.contains("    cpu00_wbm_dat_i <= (others => '0');\n"));
    }

    #[test]
    fn entity_lists_slaves_before_master() {
        let (_, ctx) = project(&[(4, 32)]);
        let code = WishboneGenerator.generate(&ctx).unwrap().code;
        let slave = code.find("-- ram00_swb connection").unwrap();
        let master = code.find("-- cpu00_mwb connection").unwrap();
        assert!(slave < master);
        assert!(code.contains("Entity cpu00_mwb is\n"));
        let adr = format!("        {:<40} : in    std_logic_vector(15 downto 0);", "cpu00_wbm_adr");
        assert!(code.contains(&adr));
        let ack = format!("        {:<40} : in    std_logic;\n", "ram00_wbs_ack");
        assert!(code.contains(&ack));
        assert!(code.contains("-- File        : cpu00_mwb_intercon.vhd"));
    }
}
