//! Descriptors shipped with pod.
//!
//! Port-type tags are shared between the two sides of a signal: the master's
//! `dataout` and the slave's `datain` are both `DAT_W`, so interfaces can be
//! wired port-by-type without a bus generator in between.

use std::collections::BTreeMap;

use crate::descriptor::BusDescriptor;
use crate::error::BusError;
use crate::role::{AxiLiteRole, ClockResetRole, Protocol, Role, WishboneRole};

/// Names of the built-in descriptors.
pub const BUILTIN_NAMES: [&str; 4] = ["wishbone", "wishbone8", "axi4lite", "candr"];

fn side<R: Into<Role> + Copy>(pairs: &[(R, &str)]) -> BTreeMap<Role, String> {
    pairs
        .iter()
        .map(|(role, ty)| ((*role).into(), ty.to_string()))
        .collect()
}

fn wishbone(name: &str, protocol: Protocol) -> Result<BusDescriptor, BusError> {
    use WishboneRole::*;
    let master = side(&[
        (Clock, "CLK"),
        (Reset, "RST"),
        (Address, "ADR"),
        (DataIn, "DAT_R"),
        (DataOut, "DAT_W"),
        (ByteEnable, "SEL"),
        (Strobe, "STB"),
        (Cycle, "CYC"),
        (Write, "WE"),
        (Ack, "ACK"),
    ]);
    let slave = side(&[
        (Clock, "CLK"),
        (Reset, "RST"),
        (Address, "ADR"),
        (DataIn, "DAT_W"),
        (DataOut, "DAT_R"),
        (ByteEnable, "SEL"),
        (Strobe, "STB"),
        (Cycle, "CYC"),
        (Write, "WE"),
        (Ack, "ACK"),
    ]);
    BusDescriptor::new(name, protocol, protocol.native_data_size(), master, slave)
}

fn axi4lite() -> Result<BusDescriptor, BusError> {
    use AxiLiteRole::*;
    let pairs = [
        (Clock, "ACLK"),
        (Reset, "ARESETN"),
        (AwAddress, "AWADDR"),
        (AwValid, "AWVALID"),
        (AwReady, "AWREADY"),
        (AwProt, "AWPROT"),
        (WData, "WDATA"),
        (WStrb, "WSTRB"),
        (WValid, "WVALID"),
        (WReady, "WREADY"),
        (BResp, "BRESP"),
        (BValid, "BVALID"),
        (BReady, "BREADY"),
        (ArAddress, "ARADDR"),
        (ArValid, "ARVALID"),
        (ArReady, "ARREADY"),
        (ArProt, "ARPROT"),
        (RData, "RDATA"),
        (RResp, "RRESP"),
        (RValid, "RVALID"),
        (RReady, "RREADY"),
    ];
    BusDescriptor::new(
        "axi4lite",
        Protocol::AxiLite,
        Protocol::AxiLite.native_data_size(),
        side(&pairs),
        side(&pairs),
    )
}

fn candr() -> Result<BusDescriptor, BusError> {
    let pairs = [(ClockResetRole::Clock, "CLK"), (ClockResetRole::Reset, "RST")];
    BusDescriptor::new("candr", Protocol::ClockReset, 0, side(&pairs), side(&pairs))
}

/// Returns the built-in descriptor called `name`, if any.
pub fn builtin(name: &str) -> Option<Result<BusDescriptor, BusError>> {
    match name {
        "wishbone" => Some(wishbone(name, Protocol::Wishbone)),
        "wishbone8" => Some(wishbone(name, Protocol::Wishbone8)),
        "axi4lite" => Some(axi4lite()),
        "candr" => Some(candr()),
        _ => None,
    }
}
