//! AXI4-Lite Intercon.
//!
//! Each slave gets four chip-selects, one per channel that carries an
//! address or a handshake toward it: write address (`aw_`), write data
//! (`w_`), read address (`ar_`) and read data (`r_`).
//!
//! The decode process resets at the level the bus descriptor gives: active
//! low for the built-in `axi4lite` descriptor, as `ARESETN` is. A descriptor
//! file sets `reset_active_low = false` for an active-high reset.

use pod_bus::{AxiLiteRole as A, Protocol};

use super::{BusProtocolGenerator, GeneratedText, Notes};
use crate::context::{byte_shift, Endpoint, InterconContext};
use crate::error::InterconError;
use crate::scaffold::{self, ChipSelect};
use crate::width::{byte_enable_name, WidthPlan};
use crate::writer::{binary, slice, VhdlWriter};

const AR_ADDRESS: &str = "araddr_s";
const AW_ADDRESS: &str = "awaddr_s";

/// Generator for AXI4-Lite.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxiLiteGenerator;

/// The four chip-selects of one slave.
struct Selects {
    aw: String,
    w: String,
    ar: String,
    r: String,
}

/// Channel a chip-select belongs to.
#[derive(Debug, Clone, Copy)]
enum Channel {
    WriteAddress,
    WriteData,
    ReadAddress,
    ReadData,
}

impl Selects {
    fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::WriteAddress => &self.aw,
            Channel::WriteData => &self.w,
            Channel::ReadAddress => &self.ar,
            Channel::ReadData => &self.r,
        }
    }

    fn of(slave: &Endpoint) -> Self {
        let cs = slave.cs_name();
        Self {
            aw: format!("aw_{cs}"),
            w: format!("w_{cs}"),
            ar: format!("ar_{cs}"),
            r: format!("r_{cs}"),
        }
    }
}

/// Mirror names of the master's AXI4-Lite signals.
struct MasterSignals<'a> {
    clk: &'a str,
    rst: &'a str,
    awaddr: &'a str,
    aw_width: u32,
    awvalid: &'a str,
    awprot: Option<&'a str>,
    wdata: &'a str,
    wstrb: Option<&'a str>,
    wvalid: &'a str,
    bready: &'a str,
    araddr: &'a str,
    ar_width: u32,
    arvalid: &'a str,
    arprot: Option<&'a str>,
    rready: &'a str,
}

impl<'a> MasterSignals<'a> {
    fn resolve(m: &'a Endpoint) -> Result<Self, InterconError> {
        let optional = move |role: A| m.signal(role).map(|p| p.name.as_str());
        Ok(Self {
            clk: m.name_of(A::Clock)?,
            rst: m.name_of(A::Reset)?,
            awaddr: m.name_of(A::AwAddress)?,
            aw_width: m.require(A::AwAddress)?.width,
            awvalid: m.name_of(A::AwValid)?,
            awprot: optional(A::AwProt),
            wdata: m.name_of(A::WData)?,
            wstrb: optional(A::WStrb),
            wvalid: m.name_of(A::WValid)?,
            bready: m.name_of(A::BReady)?,
            araddr: m.name_of(A::ArAddress)?,
            ar_width: m.require(A::ArAddress)?.width,
            arvalid: m.name_of(A::ArValid)?,
            arprot: optional(A::ArProt),
            rready: m.name_of(A::RReady)?,
        })
    }
}

impl BusProtocolGenerator for AxiLiteGenerator {
    fn protocol(&self) -> Protocol {
        Protocol::AxiLite
    }

    fn generate(&self, ctx: &InterconContext) -> Result<GeneratedText, InterconError> {
        let plan = WidthPlan::new(&ctx.master, &ctx.slaves, A::WData)?;
        let m = MasterSignals::resolve(&ctx.master)?;
        if m.wstrb.is_none() && plan.adapts() {
            return Err(InterconError::MissingRole {
                interface: ctx.master.path(),
                role: A::WStrb.into(),
            });
        }
        let mut notes = Notes::default();
        let mut w = VhdlWriter::new();

        scaffold::header(&mut w, ctx);
        scaffold::entity(&mut w, ctx);
        scaffold::architecture_head(&mut w, ctx);
        w.signal(AR_ADDRESS, &format!("std_logic_vector({} downto 0)", m.ar_width - 1));
        w.signal(AW_ADDRESS, &format!("std_logic_vector({} downto 0)", m.aw_width - 1));
        plan.declare(&mut w);
        for slave in &ctx.slaves {
            let cs = Selects::of(slave);
            for name in [&cs.aw, &cs.ar, &cs.w, &cs.r] {
                scaffold::declare_cs(&mut w, name);
            }
            if slave.has(A::RData) {
                w.signal(
                    &slave.readdata_name(),
                    &format!("std_logic_vector({} downto 0)", plan.master - 1),
                );
            }
        }
        scaffold::begin(&mut w);

        w.assign(AR_ADDRESS, m.araddr);
        w.assign(AW_ADDRESS, m.awaddr);
        w.blank();
        if let Some(strb) = m.wstrb {
            plan.write_lanes(&mut w, m.wdata, strb);
            plan.write_byte_enables(&mut w, strb);
        }
        scaffold::clock_reset_fanout(&mut w, ctx, A::Clock, A::Reset, false)?;

        w.blank();
        w.banner("Address decoding");
        for slave in &ctx.slaves {
            let shift = slave.byte_shift();
            for (role, source) in [(A::ArAddress, AR_ADDRESS), (A::AwAddress, AW_ADDRESS)] {
                if let Some(adr) = slave.signal(role) {
                    let bits = if adr.width == 1 {
                        format!("{source}({shift})")
                    } else {
                        slice(source, adr.width + shift - 1, shift)
                    };
                    w.assign(&adr.name, bits);
                }
            }
        }
        w.blank();
        let mut selects = Vec::with_capacity(ctx.slaves.len() * 4);
        for slave in &ctx.slaves {
            let cs = Selects::of(slave);
            let write = |valid: &str| scaffold::address_match(AW_ADDRESS, m.aw_width, slave, valid);
            let read = |valid: &str| scaffold::address_match(AR_ADDRESS, m.ar_width, slave, valid);
            selects.push(ChipSelect { name: cs.aw, condition: write(m.awvalid)? });
            selects.push(ChipSelect { name: cs.w, condition: write(m.wvalid)? });
            selects.push(ChipSelect { name: cs.ar, condition: read(m.arvalid)? });
            selects.push(ChipSelect { name: cs.r, condition: read(m.rready)? });
        }
        scaffold::decode_process(&mut w, m.clk, m.rst, ctx.reset_level, &[], &selects);

        control_slaves(&mut w, ctx, &m, &plan, &mut notes)?;
        control_master(&mut w, ctx)?;
        read_data(&mut w, ctx, &plan);

        scaffold::architecture_foot(&mut w, ctx);
        log::info!(
            "generated axi4lite intercon {} for {} slave(s)",
            ctx.instance,
            ctx.slaves.len()
        );
        Ok(GeneratedText::new(ctx, w.finish(), Some(&plan), notes))
    }
}

fn control_slaves(
    w: &mut VhdlWriter,
    ctx: &InterconContext,
    m: &MasterSignals<'_>,
    plan: &WidthPlan,
    notes: &mut Notes,
) -> Result<(), InterconError> {
    w.banner("Control signals to slave");
    for slave in &ctx.slaves {
        let cs = Selects::of(slave);
        w.blank();
        w.comment(format!("for {}", slave.instance));

        match slave.signal(A::WData) {
            Some(wdata) => {
                if let (Some(prot), Some(mprot)) = (slave.signal(A::AwProt), m.awprot) {
                    w.assign(&prot.name, scaffold::gated_bus(mprot, m.awvalid, &cs.aw));
                }
                w.assign(slave.name_of(A::AwValid)?, scaffold::gated(m.awvalid, &cs.aw));
                w.assign(slave.name_of(A::WValid)?, scaffold::gated(m.wvalid, &cs.w));
                w.assign(slave.name_of(A::BReady)?, scaffold::gated(m.bready, &cs.w));
                let data = plan.lane_or(slave.data_size, m.wdata);
                w.assign(&wdata.name, scaffold::gated_bus(&data, m.wvalid, &cs.w));
                if let Some(strb) = slave.signal(A::WStrb) {
                    match m.wstrb {
                        Some(mstrb) => {
                            let value = if plan.decodes.contains(&slave.data_size) {
                                byte_enable_name(slave.data_size)
                            } else {
                                mstrb.to_string()
                            };
                            w.assign(&strb.name, scaffold::gated_bus(&value, m.wvalid, &cs.w));
                        }
                        None => {
                            notes.note(format!(
                                "{} has write strobes but its master does not; all lanes enabled",
                                slave.path()
                            ));
                            w.assign(&strb.name, "(others => '1')");
                        }
                    }
                }
            }
            None => notes.note(format!("{} is read-only; write path skipped", slave.path())),
        }

        if slave.has(A::RData) {
            if let (Some(prot), Some(mprot)) = (slave.signal(A::ArProt), m.arprot) {
                w.assign(&prot.name, scaffold::gated_bus(mprot, m.arvalid, &cs.ar));
            }
            w.assign(slave.name_of(A::ArValid)?, scaffold::gated(m.arvalid, &cs.ar));
            w.assign(slave.name_of(A::RReady)?, scaffold::gated(m.rready, &cs.r));
        } else {
            notes.note(format!("{} is write-only; read path skipped", slave.path()));
        }
    }
    Ok(())
}

/// Master inputs: buses priority-selected by the channel's chip-select,
/// single-bit handshakes OR-reduced.
fn control_master(w: &mut VhdlWriter, ctx: &InterconContext) -> Result<(), InterconError> {
    w.blank();
    w.blank();
    w.banner("Control signal for master");

    let rdata: Vec<(String, String)> = ctx
        .slaves
        .iter()
        .filter(|s| s.has(A::RData))
        .map(|s| (s.readdata_name(), scaffold::selected(&Selects::of(s).r)))
        .collect();
    w.select(ctx.master.name_of(A::RData)?, &rdata, "(others => '0')");

    for (role, channel) in [(A::RResp, Channel::ReadData), (A::BResp, Channel::WriteData)] {
        let branches: Vec<(String, String)> = ctx
            .slaves
            .iter()
            .filter_map(|s| {
                let cs = Selects::of(s);
                s.signal(role)
                    .map(|p| (p.name.clone(), scaffold::selected(cs.get(channel))))
            })
            .collect();
        w.select(ctx.master.name_of(role)?, &branches, "(others => '0')");
    }

    let handshakes = [
        (A::BValid, Channel::WriteData),
        (A::AwReady, Channel::WriteAddress),
        (A::WReady, Channel::WriteData),
        (A::ArReady, Channel::ReadAddress),
        (A::RValid, Channel::ReadData),
    ];
    for (role, channel) in handshakes {
        let terms: Vec<String> = ctx
            .slaves
            .iter()
            .filter_map(|s| {
                let cs = Selects::of(s);
                s.signal(role)
                    .map(|p| scaffold::fan_in_term(&p.name, cs.get(channel)))
            })
            .collect();
        w.or_reduce(ctx.master.name_of(role)?, &terms);
    }
    w.blank();
    Ok(())
}

/// Places each slave's read data in the master's word, picking the slice
/// from the low read-address bits.
fn read_data(w: &mut VhdlWriter, ctx: &InterconContext, plan: &WidthPlan) {
    let full = plan.master;
    let word_shift = byte_shift(full);
    for slave in &ctx.slaves {
        let Some(rdata) = slave.signal(A::RData) else {
            continue;
        };
        let target = slave.readdata_name();
        let width = slave.data_size;
        if width >= full {
            w.assign(&target, &rdata.name);
            w.blank();
            continue;
        }
        let shift = slave.byte_shift();
        let index = slice(AR_ADDRESS, word_shift - 1, shift);
        let count = plan.slices(width);
        let branches: Vec<(String, String)> = (0..count - 1)
            .map(|i| {
                let bits = binary(u64::from(i), word_shift - shift);
                (plan.placed(&rdata.name, width, i), format!("{index} = \"{bits}\""))
            })
            .collect();
        w.select(&target, &branches, &plan.placed(&rdata.name, width, count - 1));
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_bus::BusLibrary;
    use pod_netlist::{ComponentDef, Direction, InterfaceClass, InterfaceDef, PortDef, Project};

    /// An AXI4-Lite interface with every role; `data` bits wide, `addr`
    /// address bits, without the write channel when `writable` is false.
    fn axi(component: &str, class: InterfaceClass, addr: u32, data: u32, writable: bool) -> ComponentDef {
        use Direction::{In, Out};
        let master = class == InterfaceClass::Master;
        let (to_slave, to_master) = if master { (Out, In) } else { (In, Out) };
        let mut ports = vec![
            ("aclk", In, 1, "ACLK"),
            ("aresetn", In, 1, "ARESETN"),
            ("araddr", to_slave, addr, "ARADDR"),
            ("arvalid", to_slave, 1, "ARVALID"),
            ("arready", to_master, 1, "ARREADY"),
            ("arprot", to_slave, 3, "ARPROT"),
            ("rdata", to_master, data, "RDATA"),
            ("rresp", to_master, 2, "RRESP"),
            ("rvalid", to_master, 1, "RVALID"),
            ("rready", to_slave, 1, "RREADY"),
        ];
        if writable {
            ports.extend([
                ("awaddr", to_slave, addr, "AWADDR"),
                ("awvalid", to_slave, 1, "AWVALID"),
                ("awready", to_master, 1, "AWREADY"),
                ("awprot", to_slave, 3, "AWPROT"),
                ("wdata", to_slave, data, "WDATA"),
                ("wstrb", to_slave, data / 8, "WSTRB"),
                ("wvalid", to_slave, 1, "WVALID"),
                ("wready", to_master, 1, "WREADY"),
                ("bresp", to_master, 2, "BRESP"),
                ("bvalid", to_master, 1, "BVALID"),
                ("bready", to_slave, 1, "BREADY"),
            ]);
        }
        let mut iface = InterfaceDef::new("axi", class).bus("axi4lite");
        for (name, dir, width, ty) in ports {
            iface = iface.port(PortDef::new(name, dir, width).typed(ty));
        }
        ComponentDef::new(component).interface(iface)
    }

    fn context(slaves: &[(u32, bool)]) -> InterconContext {
        context_in(Project::new("demo"), slaves)
    }

    fn context_in(mut p: Project, slaves: &[(u32, bool)]) -> InterconContext {
        let cpu = p
            .add_instance(&axi("cpu", InterfaceClass::Master, 16, 32, true), None)
            .unwrap();
        let m = p.interface_named(cpu, "axi").unwrap();
        for &(data, writable) in slaves {
            let def = axi("per", InterfaceClass::Slave, 4, data, writable);
            let per = p.add_instance(&def, None).unwrap();
            let s = p.interface_named(per, "axi").unwrap();
            p.bind(m, s).unwrap();
        }
        InterconContext::plan(&p, m).unwrap()
    }

    #[test]
    fn four_chip_selects_per_slave() {
        let text = AxiLiteGenerator.generate(&context(&[(32, true)])).unwrap();
        for prefix in ["aw_", "w_", "ar_", "r_"] {
            assert!(text.code.contains(&format!("signal {:<20} : std_logic := '0';", format!("{prefix}per00_axi_cs"))));
        }
        assert!(text.code.contains("decodeproc : process(cpu00_aclk, cpu00_aresetn)"));
        assert!(text.code.contains("if cpu00_aresetn='0' then"));
        assert!(text.code.contains(
            "if awaddr_s(15 downto 6)=\"0000000000\" and cpu00_wvalid='1' then"
        ));
        assert!(text.code.contains(
            "if araddr_s(15 downto 6)=\"0000000000\" and cpu00_rready='1' then"
        ));
        assert!(text.code.contains("    per00_awvalid <= (cpu00_awvalid and aw_per00_axi_cs );\n"));
        assert!(text.code.contains("    per00_araddr <= araddr_s(5 downto 2);\n"));
        assert!(text.lanes.is_empty());
    }

    #[test]
    fn active_high_descriptor_flips_the_decode_reset() {
        let mut buses = BusLibrary::new();
        let axi = pod_bus::builtin::builtin("axi4lite").unwrap().unwrap();
        buses.insert(axi.with_reset_active_low(false));
        let ctx = context_in(Project::with_buses("demo", buses), &[(32, true)]);
        assert_eq!(ctx.reset_level, '1');
        let text = AxiLiteGenerator.generate(&ctx).unwrap();
        assert!(text.code.contains("if cpu00_aresetn='1' then"));
        assert!(!text.code.contains("if cpu00_aresetn='0' then"));
    }

    #[test]
    fn master_handshakes_are_or_reduced() {
        let text = AxiLiteGenerator.generate(&context(&[(32, true), (32, true)])).unwrap();
        assert!(text.code.contains(
            "    cpu00_arready <= (per00_arready and ar_per00_axi_cs) or\n        (per01_arready and ar_per01_axi_cs);\n"
        ));
        assert!(text.code.contains(
            "    cpu00_bresp <= per00_bresp when w_per00_axi_cs='1' else\n        per01_bresp when w_per01_axi_cs='1' else\n        (others => '0');\n"
        ));
    }

    #[test]
    fn read_only_slave_skips_write_path() {
        let text = AxiLiteGenerator.generate(&context(&[(32, false)])).unwrap();
        assert_eq!(text.notes, ["per00.axi is read-only; write path skipped"]);
        assert!(!text.code.contains("per00_wdata"));
        assert!(text.code.contains("    cpu00_wready <= '0';\n"));
    }

    #[test]
    fn narrow_slave_gets_lane_and_placed_read_data() {
        let text = AxiLiteGenerator.generate(&context(&[(16, true)])).unwrap();
        assert_eq!(text.lanes, [16]);
        assert_eq!(text.byte_enable_decodes, [16]);
        assert!(text.code.contains(
            "    per00_wstrb <= byte_enable16_s when (cpu00_wvalid and w_per00_axi_cs ) = '1' else (others => '0');\n"
        ));
        assert!(text.code.contains(
            "    per00_axi_readdata_s <= (31 downto 16 => '0') & per00_rdata when araddr_s(1 downto 1) = \"0\" else\n        per00_rdata & (15 downto 0 => '0');\n"
        ));
    }

    #[test]
    fn no_slave_drives_zeros() {
        let text = AxiLiteGenerator.generate(&context(&[])).unwrap();
        assert!(text.code.contains("    cpu00_rvalid <= '0';\n"));
        assert!(text.code.contains("    cpu00_rdata <= (others => '0');\n"));
    }
}
