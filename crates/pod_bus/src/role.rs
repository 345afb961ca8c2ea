//! Bus protocols and their closed sets of signal roles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::descriptor::BusClass;

macro_rules! define_roles {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = concat!("The `", $text, "` role.")]
                $variant,
            )+
        }

        impl $name {
            /// Every role of this protocol, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Name of the role as written in descriptor files.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Parses a role name as written in descriptor files.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

define_roles!(
    /// Signal roles of the Wishbone protocols (32-bit and 8-bit).
    WishboneRole {
        Clock => "clock",
        Reset => "reset",
        Address => "address",
        DataIn => "datain",
        DataOut => "dataout",
        ByteEnable => "byteen",
        Strobe => "strobe",
        Cycle => "cycle",
        Write => "write",
        Ack => "ack",
    }
);

define_roles!(
    /// Signal roles of AXI4-Lite.
    AxiLiteRole {
        Clock => "clock",
        Reset => "reset",
        AwAddress => "awaddress",
        AwValid => "awvalid",
        AwReady => "awready",
        AwProt => "awprot",
        WData => "wdata",
        WStrb => "wstrb",
        WValid => "wvalid",
        WReady => "wready",
        BResp => "bresp",
        BValid => "bvalid",
        BReady => "bready",
        ArAddress => "araddress",
        ArValid => "arvalid",
        ArReady => "arready",
        ArProt => "arprot",
        RData => "rdata",
        RResp => "rresp",
        RValid => "rvalid",
        RReady => "rready",
    }
);

define_roles!(
    /// Signal roles of the clock and reset pseudo-bus.
    ClockResetRole {
        Clock => "clock",
        Reset => "reset",
    }
);

/// A signal role tagged with the protocol it belongs to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Role {
    /// A Wishbone role.
    Wishbone(WishboneRole),
    /// An AXI4-Lite role.
    AxiLite(AxiLiteRole),
    /// A clock/reset role.
    ClockReset(ClockResetRole),
}

impl Role {
    /// Name of the role as written in descriptor files.
    pub fn name(self) -> &'static str {
        match self {
            Role::Wishbone(r) => r.name(),
            Role::AxiLite(r) => r.name(),
            Role::ClockReset(r) => r.name(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<WishboneRole> for Role {
    fn from(r: WishboneRole) -> Self {
        Role::Wishbone(r)
    }
}

impl From<AxiLiteRole> for Role {
    fn from(r: AxiLiteRole) -> Self {
        Role::AxiLite(r)
    }
}

impl From<ClockResetRole> for Role {
    fn from(r: ClockResetRole) -> Self {
        Role::ClockReset(r)
    }
}

/// A bus protocol with its own role set and Intercon generator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Protocol {
    /// Wishbone with width adaptation toward narrower slaves.
    Wishbone,
    /// 8-bit Wishbone, no width adaptation.
    Wishbone8,
    /// AXI4-Lite.
    AxiLite,
    /// Clock and reset distribution only.
    ClockReset,
}

impl Protocol {
    /// All protocols.
    pub const ALL: [Protocol; 4] = [
        Protocol::Wishbone,
        Protocol::Wishbone8,
        Protocol::AxiLite,
        Protocol::ClockReset,
    ];

    /// Name used in descriptor files.
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Wishbone => "wishbone",
            Protocol::Wishbone8 => "wishbone8",
            Protocol::AxiLite => "axi4lite",
            Protocol::ClockReset => "candr",
        }
    }

    /// Parses a protocol name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Whether the reset of this protocol is active low by default.
    pub fn reset_active_low(self) -> bool {
        matches!(self, Protocol::AxiLite)
    }

    /// Native data width of the protocol, in bits.
    pub fn native_data_size(self) -> u32 {
        match self {
            Protocol::Wishbone | Protocol::AxiLite => 32,
            Protocol::Wishbone8 => 8,
            Protocol::ClockReset => 0,
        }
    }

    /// Parses a role name within this protocol.
    pub fn parse_role(self, name: &str) -> Option<Role> {
        match self {
            Protocol::Wishbone | Protocol::Wishbone8 => {
                WishboneRole::from_name(name).map(Role::Wishbone)
            }
            Protocol::AxiLite => AxiLiteRole::from_name(name).map(Role::AxiLite),
            Protocol::ClockReset => ClockResetRole::from_name(name).map(Role::ClockReset),
        }
    }

    /// Roles every interface of `class` speaking this protocol must carry.
    ///
    /// Data, address and byte-enable roles of a slave are optional: a
    /// write-only slave has no read data, a single-register slave may have no
    /// address. Whether a slave's optional roles form a coherent set is checked
    /// by the generator.
    pub fn required_roles(self, class: BusClass) -> Vec<Role> {
        use AxiLiteRole as A;
        use WishboneRole as W;
        match (self, class) {
            (Protocol::Wishbone | Protocol::Wishbone8, BusClass::Master) => [
                W::Clock,
                W::Reset,
                W::Address,
                W::DataIn,
                W::DataOut,
                W::Strobe,
                W::Cycle,
                W::Write,
                W::Ack,
            ]
            .into_iter()
            .map(Role::Wishbone)
            .collect(),
            (Protocol::Wishbone | Protocol::Wishbone8, BusClass::Slave) => {
                [W::Clock, W::Reset, W::Strobe, W::Cycle, W::Ack]
                    .into_iter()
                    .map(Role::Wishbone)
                    .collect()
            }
            (Protocol::AxiLite, BusClass::Master) => AxiLiteRole::ALL
                .iter()
                .copied()
                .filter(|r| !matches!(r, A::AwProt | A::ArProt | A::WStrb))
                .map(Role::AxiLite)
                .collect(),
            (Protocol::AxiLite, BusClass::Slave) => vec![A::Clock.into(), A::Reset.into()],
            (Protocol::ClockReset, BusClass::Master) => {
                vec![ClockResetRole::Clock.into(), ClockResetRole::Reset.into()]
            }
            (Protocol::ClockReset, BusClass::Slave) => vec![ClockResetRole::Clock.into()],
        }
    }

    /// Roles whose port width is the interface address width, by preference.
    pub fn address_roles(self) -> &'static [Role] {
        match self {
            Protocol::Wishbone | Protocol::Wishbone8 => &[Role::Wishbone(WishboneRole::Address)],
            Protocol::AxiLite => &[
                Role::AxiLite(AxiLiteRole::ArAddress),
                Role::AxiLite(AxiLiteRole::AwAddress),
            ],
            Protocol::ClockReset => &[],
        }
    }

    /// Roles whose port width is the interface data width, by preference.
    pub fn data_roles(self, class: BusClass) -> &'static [Role] {
        match (self, class) {
            (Protocol::Wishbone | Protocol::Wishbone8, BusClass::Master) => &[
                Role::Wishbone(WishboneRole::DataOut),
                Role::Wishbone(WishboneRole::DataIn),
            ],
            (Protocol::Wishbone | Protocol::Wishbone8, BusClass::Slave) => &[
                Role::Wishbone(WishboneRole::DataIn),
                Role::Wishbone(WishboneRole::DataOut),
            ],
            (Protocol::AxiLite, _) => &[
                Role::AxiLite(AxiLiteRole::WData),
                Role::AxiLite(AxiLiteRole::RData),
            ],
            (Protocol::ClockReset, _) => &[],
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_roundtrip() {
        for role in WishboneRole::ALL {
            assert_eq!(WishboneRole::from_name(role.name()), Some(*role));
        }
        for role in AxiLiteRole::ALL {
            assert_eq!(AxiLiteRole::from_name(role.name()), Some(*role));
        }
    }

    #[test]
    fn parse_role_is_protocol_scoped() {
        assert_eq!(
            Protocol::Wishbone.parse_role("ack"),
            Some(Role::Wishbone(WishboneRole::Ack))
        );
        assert_eq!(Protocol::AxiLite.parse_role("ack"), None);
        assert_eq!(Protocol::ClockReset.parse_role("strobe"), None);
        assert_eq!(
            Protocol::Wishbone8.parse_role("byteen"),
            Some(Role::Wishbone(WishboneRole::ByteEnable))
        );
    }

    #[test]
    fn protocol_names() {
        for p in Protocol::ALL {
            assert_eq!(Protocol::from_name(p.name()), Some(p));
        }
        assert_eq!(Protocol::from_name("pcie"), None);
    }

    #[test]
    fn axi_master_requires_channels_but_not_prot() {
        let req = Protocol::AxiLite.required_roles(BusClass::Master);
        assert!(req.contains(&Role::AxiLite(AxiLiteRole::AwValid)));
        assert!(req.contains(&Role::AxiLite(AxiLiteRole::RData)));
        assert!(!req.contains(&Role::AxiLite(AxiLiteRole::AwProt)));
        assert!(!req.contains(&Role::AxiLite(AxiLiteRole::WStrb)));
    }

    #[test]
    fn wishbone_slave_data_is_optional() {
        let req = Protocol::Wishbone.required_roles(BusClass::Slave);
        assert!(!req.contains(&Role::Wishbone(WishboneRole::DataIn)));
        assert!(req.contains(&Role::Wishbone(WishboneRole::Ack)));
    }
}
