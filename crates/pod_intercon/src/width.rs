//! Data-width adaptation between a master and narrower slaves.

use pod_bus::Role;

use crate::context::Endpoint;
use crate::error::InterconError;
use crate::writer::{slice, VhdlWriter};

/// Width adaptation needed by one Intercon.
///
/// Every distinct slave width narrower than the master gets one byte-enable
/// decode; those whose slaves take write data also get one write lane.
/// Slaves as wide as the master need neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthPlan {
    /// Master data width in bits.
    pub master: u32,
    /// Widths with a `writedata<N>_s` lane, ascending.
    pub lanes: Vec<u32>,
    /// Widths with a `byte_enable<N>_s` decode, ascending.
    pub decodes: Vec<u32>,
}

fn adaptable(master: u32, slave: u32) -> bool {
    master >= 8
        && slave >= 8
        && master.is_power_of_two()
        && slave.is_power_of_two()
        && slave <= master
}

impl WidthPlan {
    /// Plans adaptation toward every slave; `write` is the slave role that
    /// takes write data.
    pub fn new(
        master: &Endpoint,
        slaves: &[Endpoint],
        write: impl Into<Role>,
    ) -> Result<Self, InterconError> {
        let write = write.into();
        let m = master.data_size;
        let mut lanes = Vec::new();
        let mut decodes = Vec::new();
        for slave in slaves {
            let s = slave.data_size;
            if !adaptable(m, s) {
                return Err(unsupported(master, slave));
            }
            if s < m {
                decodes.push(s);
                if slave.has(write) {
                    lanes.push(s);
                }
            }
        }
        lanes.sort_unstable();
        lanes.dedup();
        decodes.sort_unstable();
        decodes.dedup();
        Ok(Self {
            master: m,
            lanes,
            decodes,
        })
    }

    /// A plan without adaptation; every slave must match the master.
    pub fn exact(master: &Endpoint, slaves: &[Endpoint]) -> Result<Self, InterconError> {
        if let Some(slave) = slaves.iter().find(|s| s.data_size != master.data_size) {
            return Err(unsupported(master, slave));
        }
        Ok(Self {
            master: master.data_size,
            lanes: Vec::new(),
            decodes: Vec::new(),
        })
    }

    /// Whether any slave is narrower than the master.
    pub fn adapts(&self) -> bool {
        !self.decodes.is_empty()
    }

    /// Number of bytes in a master word.
    pub fn master_bytes(&self) -> u32 {
        self.master / 8
    }

    /// Number of `width`-bit slices in a master word.
    pub fn slices(&self, width: u32) -> u32 {
        self.master / width.max(1)
    }

    /// Byte-enable pattern selecting slice `index` of a `width`-bit slave,
    /// as a quoted binary literal one bit per master byte.
    pub fn pattern(&self, width: u32, index: u32) -> String {
        let bytes = width / 8;
        let mask = 1u64.checked_shl(bytes).map_or(u64::MAX, |b| b - 1);
        let value = mask.checked_shl(bytes * index).unwrap_or(0);
        format!("\"{}\"", crate::writer::binary(value, self.master_bytes()))
    }

    /// Lane signal of `width`, or `full` when `width` needs no lane.
    pub fn lane_or(&self, width: u32, full: &str) -> String {
        if self.lanes.contains(&width) {
            lane_name(width)
        } else {
            full.to_string()
        }
    }

    /// `data`, `width` bits wide, zero-padded into slice `index` of a
    /// master word.
    pub fn placed(&self, data: &str, width: u32, index: u32) -> String {
        let full = self.master;
        let mut value = String::new();
        if (index + 1) * width < full {
            value.push_str(&format!("({} downto {} => '0') & ", full - 1, (index + 1) * width));
        }
        value.push_str(data);
        if index > 0 {
            value.push_str(&format!(" & ({} downto 0 => '0')", index * width - 1));
        }
        value
    }

    /// Declares the lane and byte-enable signals.
    pub fn declare(&self, w: &mut VhdlWriter) {
        for &width in &self.lanes {
            w.signal(&lane_name(width), &format!("std_logic_vector({} downto 0)", width - 1));
        }
        for &width in &self.decodes {
            w.signal(
                &byte_enable_name(width),
                &format!("std_logic_vector({} downto 0)", width / 8 - 1),
            );
        }
    }

    /// Writes each lane: the slice of `data` picked by the byte enables
    /// `sel`, the top slice by default.
    pub fn write_lanes(&self, w: &mut VhdlWriter, data: &str, sel: &str) {
        for &width in &self.lanes {
            let count = self.slices(width);
            let branches: Vec<(String, String)> = (0..count - 1)
                .map(|i| {
                    (
                        slice(data, (i + 1) * width - 1, i * width),
                        format!("{sel} = {}", self.pattern(width, i)),
                    )
                })
                .collect();
            let last = count - 1;
            let default = slice(data, (last + 1) * width - 1, last * width);
            w.select(&lane_name(width), &branches, &default);
            w.blank();
        }
    }

    /// Writes each byte-enable decode: the OR of the `sel` slices one slave
    /// word wide.
    pub fn write_byte_enables(&self, w: &mut VhdlWriter, sel: &str) {
        if self.decodes.is_empty() {
            return;
        }
        w.comment("Byte enable muxing");
        for &width in &self.decodes {
            let bytes = width / 8;
            let terms: Vec<String> = (0..self.slices(width))
                .map(|i| slice(sel, bytes * i + bytes - 1, bytes * i))
                .collect();
            w.or_reduce(&byte_enable_name(width), &terms);
        }
        w.blank();
    }
}

/// `writedata<N>_s`.
pub fn lane_name(width: u32) -> String {
    format!("writedata{width}_s")
}

/// `byte_enable<N>_s`.
pub fn byte_enable_name(width: u32) -> String {
    format!("byte_enable{width}_s")
}

fn unsupported(master: &Endpoint, slave: &Endpoint) -> InterconError {
    InterconError::UnsupportedWidth {
        master: master.path(),
        slave: slave.path(),
        master_width: master.data_size,
        slave_width: slave.data_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_bus::WishboneRole;
    use pod_netlist::InterfaceId;

    fn endpoint(name: &str, data_size: u32, writable: bool) -> Endpoint {
        let role = writable.then_some(Role::Wishbone(WishboneRole::DataIn));
        Endpoint {
            interface: InterfaceId::from_raw(0),
            instance: name.to_string(),
            name: "swb".to_string(),
            addr_size: 4,
            data_size,
            base: 0,
            ports: vec![crate::context::MirrorPort {
                port: pod_netlist::PortId::from_raw(0),
                name: format!("{name}_dat_i"),
                direction: pod_netlist::Direction::Out,
                width: data_size,
                port_type: None,
                role,
            }],
        }
    }

    #[test]
    fn equal_width_needs_nothing() {
        let master = endpoint("cpu", 32, true);
        let plan = WidthPlan::new(&master, &[endpoint("a", 32, true)], WishboneRole::DataIn)
            .unwrap();
        assert!(plan.lanes.is_empty());
        assert!(plan.decodes.is_empty());
        assert!(!plan.adapts());
    }

    #[test]
    fn half_width_gets_one_lane_and_one_decode() {
        let master = endpoint("cpu", 32, true);
        let slaves = [endpoint("a", 16, true), endpoint("b", 16, true)];
        let plan = WidthPlan::new(&master, &slaves, WishboneRole::DataIn).unwrap();
        assert_eq!(plan.lanes, [16]);
        assert_eq!(plan.decodes, [16]);
    }

    #[test]
    fn read_only_slave_has_no_lane() {
        let master = endpoint("cpu", 32, true);
        let plan = WidthPlan::new(&master, &[endpoint("rom", 8, false)], WishboneRole::DataIn)
            .unwrap();
        assert!(plan.lanes.is_empty());
        assert_eq!(plan.decodes, [8]);
    }

    #[test]
    fn wider_or_odd_slaves_are_rejected() {
        let master = endpoint("cpu", 32, true);
        for width in [64, 24, 4] {
            let err = WidthPlan::new(&master, &[endpoint("x", width, true)], WishboneRole::DataIn)
                .unwrap_err();
            assert!(matches!(err, InterconError::UnsupportedWidth { slave_width, .. } if slave_width == width));
        }
        assert!(WidthPlan::exact(&master, &[endpoint("x", 16, true)]).is_err());
    }

    #[test]
    fn patterns_one_bit_per_byte() {
        let plan = WidthPlan {
            master: 32,
            lanes: vec![16],
            decodes: vec![8, 16],
        };
        assert_eq!(plan.pattern(16, 0), "\"0011\"");
        assert_eq!(plan.pattern(16, 1), "\"1100\"");
        assert_eq!(plan.pattern(8, 2), "\"0100\"");
    }

    #[test]
    fn lane_text() {
        let plan = WidthPlan {
            master: 32,
            lanes: vec![16],
            decodes: vec![16],
        };
        let mut w = VhdlWriter::new();
        plan.write_lanes(&mut w, "m_dat", "m_sel");
        plan.write_byte_enables(&mut w, "m_sel");
        let text = w.finish();
        assert!(text.contains(
            "writedata16_s <= m_dat(15 downto 0) when m_sel = \"0011\" else\n    m_dat(31 downto 16);"
        ));
        assert!(text.contains("byte_enable16_s <= m_sel(1 downto 0) or\n    m_sel(3 downto 2);"));
        assert_eq!(plan.lane_or(16, "m_dat"), "writedata16_s");
        assert_eq!(plan.lane_or(32, "m_dat"), "m_dat");
    }
}
