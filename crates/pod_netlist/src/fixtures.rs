//! Component definitions shared by unit tests here and in dependent crates.
//!
//! Built with the `testing` feature.

use crate::component::{ComponentDef, GenericDef, GenericOpDef, InterfaceDef, PortDef};
use crate::direction::Direction::{self, In, Out};
use crate::interface::InterfaceClass;

/// A general-purpose block with `dout`/`din` ports of `width` bits.
pub fn gpio(component: &str, width: u32) -> ComponentDef {
    ComponentDef::new(component).interface(
        InterfaceDef::new("pins", InterfaceClass::Gls)
            .port(PortDef::new("dout", Out, width))
            .port(PortDef::new("din", In, width)),
    )
}

/// A 32-bit Wishbone master with a 16-bit address.
pub fn wb_master(component: &str) -> ComponentDef {
    ComponentDef::new(component).interface(
        InterfaceDef::new("mwb", InterfaceClass::Master)
            .bus("wishbone")
            .port(PortDef::new("wbm_clk", In, 1).typed("CLK"))
            .port(PortDef::new("wbm_rst", In, 1).typed("RST"))
            .port(PortDef::new("wbm_adr", Out, 16).typed("ADR"))
            .port(PortDef::new("wbm_dat_o", Out, 32).typed("DAT_W"))
            .port(PortDef::new("wbm_dat_i", In, 32).typed("DAT_R"))
            .port(PortDef::new("wbm_sel", Out, 4).typed("SEL"))
            .port(PortDef::new("wbm_stb", Out, 1).typed("STB"))
            .port(PortDef::new("wbm_cyc", Out, 1).typed("CYC"))
            .port(PortDef::new("wbm_we", Out, 1).typed("WE"))
            .port(PortDef::new("wbm_ack", In, 1).typed("ACK")),
    )
}

fn wb_slave_interface(addr: Option<PortDef>, data: u32) -> InterfaceDef {
    let mut iface = InterfaceDef::new("swb", InterfaceClass::Slave)
        .bus("wishbone")
        .port(PortDef::new("wbs_clk", In, 1).typed("CLK"))
        .port(PortDef::new("wbs_rst", In, 1).typed("RST"));
    if let Some(addr) = addr {
        iface = iface.port(addr);
    }
    iface
        .port(PortDef::new("wbs_dat_i", In, data).typed("DAT_W"))
        .port(PortDef::new("wbs_dat_o", Out, data).typed("DAT_R"))
        .port(PortDef::new("wbs_stb", In, 1).typed("STB"))
        .port(PortDef::new("wbs_cyc", In, 1).typed("CYC"))
        .port(PortDef::new("wbs_we", In, 1).typed("WE"))
        .port(PortDef::new("wbs_ack", Out, 1).typed("ACK"))
        .register("reg0", 0)
        .register("reg1", 1)
}

/// A Wishbone slave with an `addr`-bit address (none if 0) and `data`-bit
/// data ports.
pub fn wb_slave(component: &str, addr: u32, data: u32) -> ComponentDef {
    let addr = (addr > 0).then(|| PortDef::new("wbs_adr", In, addr).typed("ADR"));
    ComponentDef::new(component)
        .interface(wb_slave_interface(addr, data))
        .generic(GenericDef::natural("id", 0))
}

/// A 32-bit Wishbone slave whose address width is the `ADDR_WIDTH` generic.
pub fn generic_slave(component: &str, addr: u32) -> ComponentDef {
    let adr = PortDef::new("wbs_adr", In, 0)
        .typed("ADR")
        .sized_by("ADDR_WIDTH");
    let mut ram_size = GenericDef::natural("RAM_SIZE", 0);
    ram_size.op = Some(GenericOpDef::RealSizeOf("wbs_adr".to_string()));
    ComponentDef::new(component)
        .interface(wb_slave_interface(Some(adr), 32))
        .generic(GenericDef::natural("ADDR_WIDTH", u64::from(addr)))
        .generic(ram_size)
}

/// An AXI4-Lite slave with a 4-bit write address and no read address.
pub fn axi_slave(component: &str) -> ComponentDef {
    ComponentDef::new(component).interface(
        InterfaceDef::new("saxi", InterfaceClass::Slave)
            .bus("axi4lite")
            .port(PortDef::new("s_aclk", In, 1).typed("ACLK"))
            .port(PortDef::new("s_aresetn", In, 1).typed("ARESETN"))
            .port(PortDef::new("s_awaddr", In, 4).typed("AWADDR"))
            .port(PortDef::new("s_wdata", In, 32).typed("WDATA"))
            .port(PortDef::new("s_rdata", Out, 32).typed("RDATA")),
    )
}

/// A `clk_rst` interface driving `clk` and `rst`.
pub fn clock_source(component: &str) -> ComponentDef {
    ComponentDef::new(component).interface(
        InterfaceDef::new("candr", InterfaceClass::ClkRst)
            .port(PortDef::new("clk", Out, 1).typed("CLK"))
            .port(PortDef::new("rst", Out, 1).typed("RST")),
    )
}

/// A `clk_rst` interface receiving `clk` and `rst`.
pub fn clock_sink(component: &str) -> ComponentDef {
    ComponentDef::new(component).interface(
        InterfaceDef::new("candr", InterfaceClass::ClkRst)
            .port(PortDef::new("clk", In, 1).typed("CLK"))
            .port(PortDef::new("rst", In, 1).typed("RST")),
    )
}

fn candr_interface(class: InterfaceClass, dir: Direction) -> InterfaceDef {
    InterfaceDef::new("candr", class)
        .bus("candr")
        .port(PortDef::new("clk", dir, 1).typed("CLK"))
        .port(PortDef::new("rst", dir, 1).typed("RST"))
}

/// A `candr` bus master driving `clk` and `rst`.
pub fn candr_master(component: &str) -> ComponentDef {
    ComponentDef::new(component).interface(candr_interface(InterfaceClass::Master, Out))
}

/// A `candr` bus slave receiving `clk` and `rst`.
pub fn candr_slave(component: &str) -> ComponentDef {
    ComponentDef::new(component).interface(candr_interface(InterfaceClass::Slave, In))
}
