//! Bus bindings: slaves attached to masters, their address windows, and
//! clock domains.

use pod_bus::{BusClass, Role};
use serde::Serialize;

use crate::allocmem::Owner;
use crate::direction::Direction;
use crate::error::NetlistError;
use crate::ids::{InterfaceId, PortId};
use crate::interface::InterfaceClass;
use crate::project::Project;
use crate::register::Access;
use crate::slave::InterfaceRef;

/// One row of a master's memory map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MapRow {
    /// First address, as `0x` followed by at least two hex digits.
    pub address: String,
    /// `instance.interface` of the owner, `--void--` for a gap.
    pub owner: String,
    /// Size in bytes.
    pub size: u64,
    /// Unique id of the slave, absent for gaps.
    pub id: Option<u32>,
}

/// One register of a slave, at its absolute address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRow {
    /// Absolute address, formatted like [`MapRow::address`].
    pub address: String,
    /// `instance.interface` of the slave.
    pub slave: String,
    /// Register name.
    pub register: String,
    /// Access mode.
    pub access: Access,
}

/// Label of a gap in a memory map.
pub const VOID_OWNER: &str = "--void--";

fn hex(address: u64) -> String {
    format!("0x{address:02x}")
}

impl Project {
    fn expect_class(
        &self,
        id: InterfaceId,
        expected: InterfaceClass,
    ) -> Result<(), NetlistError> {
        let iface = self.live_interface(id)?;
        if iface.class != expected {
            return Err(NetlistError::ClassMismatch {
                path: self.interface_path(id),
                actual: iface.class.to_string(),
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    // -- sizes --

    /// Port of `interface` carrying `role`, looked up through its bus.
    pub fn role_port(&self, interface: InterfaceId, role: impl Into<Role>) -> Option<PortId> {
        let iface = self.interfaces.get(interface)?;
        let class = iface.class.bus_class()?;
        let ty = iface.bus.as_ref()?.resolve(class, role).ok()?;
        iface
            .ports
            .iter()
            .copied()
            .find(|&p| self.ports[p].port_type.as_deref() == Some(ty))
    }

    /// Width of the first present role port in `roles`.
    fn first_role_width(
        &self,
        interface: InterfaceId,
        roles: &[Role],
    ) -> Result<Option<u32>, NetlistError> {
        for &role in roles {
            if let Some(port) = self.role_port(interface, role) {
                return self.port_width(port).map(Some);
            }
        }
        Ok(None)
    }

    /// Address width of a bus interface, 0 without an address port.
    pub fn addr_size(&self, interface: InterfaceId) -> Result<u32, NetlistError> {
        let iface = self.live_interface(interface)?;
        let Some(bus) = iface.bus.as_ref() else {
            return Err(NetlistError::NotBus(self.interface_path(interface)));
        };
        Ok(self
            .first_role_width(interface, bus.protocol().address_roles())?
            .unwrap_or(0))
    }

    /// Data width of a bus interface.
    ///
    /// An explicit width on the interface wins, then the width of its data
    /// port, then the width its bus declares.
    pub fn data_size(&self, interface: InterfaceId) -> Result<u32, NetlistError> {
        let iface = self.live_interface(interface)?;
        if let Some(size) = iface.data_size {
            return Ok(size);
        }
        let Some(bus) = iface.bus.as_ref() else {
            return Err(NetlistError::NotBus(self.interface_path(interface)));
        };
        let class = iface.class.bus_class().unwrap_or(BusClass::Slave);
        let width = self.first_role_width(interface, bus.protocol().data_roles(class))?;
        Ok(width.unwrap_or(bus.data_size()))
    }

    /// Whether the bus of `interface` carries addresses at all.
    pub fn is_addressed(&self, interface: InterfaceId) -> Result<bool, NetlistError> {
        let iface = self.live_interface(interface)?;
        let Some(bus) = iface.bus.as_ref() else {
            return Err(NetlistError::NotBus(self.interface_path(interface)));
        };
        Ok(!bus.protocol().address_roles().is_empty())
    }

    /// Size in bytes of a slave's address window:
    /// `2^addr_size * max(1, data_size / 8)`, or 0 on a bus without
    /// addresses.
    pub fn mem_size(&self, interface: InterfaceId) -> Result<u64, NetlistError> {
        if !self.is_addressed(interface)? {
            return Ok(0);
        }
        let addr = self.addr_size(interface)?;
        let bytes = u64::from((self.data_size(interface)? / 8).max(1));
        let words = 1u64.checked_shl(addr).unwrap_or(0);
        Ok(words.saturating_mul(bytes))
    }

    // -- bindings --

    /// Bus master interfaces.
    pub fn masters(&self) -> Vec<InterfaceId> {
        self.interfaces
            .iter()
            .filter(|(_, i)| i.class == InterfaceClass::Master && i.bus.is_some())
            .map(|(id, _)| id)
            .collect()
    }

    /// Slaves bound to `master`, in binding order.
    pub fn bound_slaves(&self, master: InterfaceId) -> Result<Vec<InterfaceId>, NetlistError> {
        let iface = self.live_interface(master)?;
        let Some(alloc) = iface.alloc.as_ref() else {
            return Ok(Vec::new());
        };
        alloc
            .windows()
            .iter()
            .map(|w| {
                self.resolve_ref(w.binding.slave)
                    .ok_or_else(|| NetlistError::DanglingBinding(self.ref_path(w.binding.slave)))
            })
            .collect()
    }

    /// Master a slave is bound to.
    pub fn master_of(&self, slave: InterfaceId) -> Option<InterfaceId> {
        self.resolve_ref(self.interfaces.get(slave)?.master?)
    }

    /// Binds `slave` to `master` and returns the slave's unique id.
    ///
    /// Both interfaces must speak the same bus. The slave's window is
    /// allocated by the master's allocator; an explicit base on the slave is
    /// kept if aligned. On success the slave instance's `id` generic, if
    /// any, is set to the unique id.
    pub fn bind(&mut self, master: InterfaceId, slave: InterfaceId) -> Result<u32, NetlistError> {
        self.expect_class(master, InterfaceClass::Master)?;
        self.expect_class(slave, InterfaceClass::Slave)?;
        let m = &self.interfaces[master];
        let s = &self.interfaces[slave];
        let master_path = self.interface_path(master);
        let slave_path = self.interface_path(slave);
        let (Some(mbus), Some(sbus)) = (m.bus_name(), s.bus_name()) else {
            let path = if m.bus.is_none() { master_path } else { slave_path };
            return Err(NetlistError::NotBus(path));
        };
        if mbus != sbus {
            return Err(NetlistError::BusMismatch {
                master: master_path,
                master_bus: mbus.to_string(),
                slave: slave_path,
                slave_bus: sbus.to_string(),
            });
        }
        if let Some(current) = s.master {
            return Err(NetlistError::DuplicateBinding {
                master: self.ref_path(current),
                slave: slave_path,
            });
        }
        let explicit = s.explicit_base;
        let size = self.mem_size(slave)?;
        if size == 0 && self.is_addressed(slave)? {
            return Err(NetlistError::EmptyWindow(slave_path));
        }
        let me = self.interface_ref(slave);
        let master_ref = self.interface_ref(master);
        let instance = s.instance;

        let window = self.interfaces[master]
            .alloc
            .get_or_insert_with(Default::default)
            .bind(me, size, explicit)
            .map_err(|e| NetlistError::from_alloc(e, master_path.clone(), slave_path.clone()))?;
        self.interfaces[slave].master = Some(master_ref);
        let unique_id = window.binding.unique_id;
        if let Some(id_generic) = self.interner.get("id") {
            if let Some(g) = self.instances[instance].generic_mut(id_generic) {
                g.value = unique_id.to_string();
            }
        }
        log::info!(
            "bound {slave_path} to {master_path} at {} (id {unique_id})",
            hex(window.base)
        );
        Ok(unique_id)
    }

    /// Releases the binding of `slave` to `master`.
    pub fn unbind(&mut self, master: InterfaceId, slave: InterfaceId) -> Result<(), NetlistError> {
        self.live_interface(master)?;
        let s = self.live_interface(slave)?;
        let master_path = self.interface_path(master);
        let slave_path = self.interface_path(slave);
        let master_ref = self.interface_ref(master);
        if s.master != Some(master_ref) {
            return Err(NetlistError::NotBound {
                master: master_path,
                slave: slave_path,
            });
        }
        let me = self.interface_ref(slave);
        let alloc = self.interfaces[master].alloc.as_mut().ok_or_else(|| {
            NetlistError::NotBound {
                master: master_path.clone(),
                slave: slave_path.clone(),
            }
        })?;
        alloc
            .unbind(me)
            .map_err(|e| NetlistError::from_alloc(e, master_path.clone(), slave_path.clone()))?;
        self.interfaces[slave].master = None;
        log::info!("unbound {slave_path} from {master_path}");
        Ok(())
    }

    /// Pins the window of `slave` at `base`.
    ///
    /// The base must be a multiple of the slave's window size; a misaligned
    /// base is refused and nothing changes. A bound slave's master
    /// reallocates its implicit windows around it.
    pub fn set_base_address(&mut self, slave: InterfaceId, base: u64) -> Result<(), NetlistError> {
        self.expect_class(slave, InterfaceClass::Slave)?;
        let slave_path = self.interface_path(slave);
        let size = self.mem_size(slave)?;
        if size == 0 {
            return Err(NetlistError::EmptyWindow(slave_path));
        }
        if base % size != 0 {
            return Err(NetlistError::Misaligned {
                slave: slave_path,
                base,
                size,
            });
        }
        if base.checked_add(size).is_none() {
            return Err(NetlistError::WindowOutOfRange {
                slave: slave_path,
                base,
                size,
            });
        }
        if let Some(master_ref) = self.interfaces[slave].master {
            let master = self
                .resolve_ref(master_ref)
                .ok_or_else(|| NetlistError::DanglingBinding(self.ref_path(master_ref)))?;
            let master_path = self.interface_path(master);
            let me = self.interface_ref(slave);
            let alloc = self.interfaces[master].alloc.as_mut().ok_or_else(|| {
                NetlistError::DanglingBinding(slave_path.clone())
            })?;
            alloc
                .set_base(me, base)
                .map_err(|e| NetlistError::from_alloc(e, master_path, slave_path.clone()))?;
        }
        self.interfaces[slave].explicit_base = Some(base);
        log::info!("base address of {slave_path} set to {}", hex(base));
        Ok(())
    }

    /// Current base address of `slave`: its window if bound, otherwise its
    /// explicit base.
    pub fn base_address(&self, slave: InterfaceId) -> Option<u64> {
        let iface = self.interfaces.get(slave)?;
        match self.master_of(slave) {
            Some(master) => self.interfaces[master]
                .alloc
                .as_ref()?
                .window(self.interface_ref(slave))
                .map(|w| w.base),
            None => iface.explicit_base,
        }
    }

    /// Unique id of a bound slave.
    pub fn unique_id(&self, slave: InterfaceId) -> Option<u32> {
        let master = self.master_of(slave)?;
        self.interfaces[master]
            .alloc
            .as_ref()?
            .window(self.interface_ref(slave))
            .map(|w| w.binding.unique_id)
    }

    /// Memory map of `master`, ordered by address.
    pub fn mapping(&self, master: InterfaceId) -> Result<Vec<MapRow>, NetlistError> {
        self.expect_class(master, InterfaceClass::Master)?;
        let Some(alloc) = self.interfaces[master].alloc.as_ref() else {
            return Ok(Vec::new());
        };
        Ok(alloc
            .mapping()
            .into_iter()
            .map(|entry| MapRow {
                address: hex(entry.address),
                owner: match entry.owner {
                    Owner::Slave(r) => self.ref_path(r),
                    Owner::Void => VOID_OWNER.to_string(),
                },
                size: entry.size,
                id: entry.id,
            })
            .collect())
    }

    /// Registers of every slave bound to `master`, at absolute addresses.
    pub fn register_map(&self, master: InterfaceId) -> Result<Vec<RegisterRow>, NetlistError> {
        let mut rows = Vec::new();
        for slave in self.bound_slaves(master)? {
            let Some(base) = self.base_address(slave) else {
                continue;
            };
            let data_size = self.data_size(slave)?;
            let path = self.interface_path(slave);
            for reg in &self.interfaces[slave].registers {
                rows.push((
                    reg.address(base, data_size),
                    RegisterRow {
                        address: hex(reg.address(base, data_size)),
                        slave: path.clone(),
                        register: self.name_of(reg.name).to_string(),
                        access: reg.access,
                    },
                ));
            }
        }
        rows.sort_by_key(|(address, _)| *address);
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    /// Binds every unbound slave of `bus` to the bus's only master.
    ///
    /// Returns the unique ids handed out. Every slave is checked before the
    /// first binding is made.
    pub fn auto_connect_bus(&mut self, bus: &str) -> Result<Vec<u32>, NetlistError> {
        let masters: Vec<InterfaceId> = self
            .masters()
            .into_iter()
            .filter(|&m| self.interfaces[m].bus_name() == Some(bus))
            .collect();
        let [master] = masters[..] else {
            return Err(NetlistError::AmbiguousMaster {
                bus: bus.to_string(),
                count: masters.len(),
            });
        };
        let slaves: Vec<InterfaceId> = self
            .interfaces
            .iter()
            .filter(|(_, i)| {
                i.class == InterfaceClass::Slave && i.bus_name() == Some(bus) && i.master.is_none()
            })
            .map(|(id, _)| id)
            .collect();
        for &slave in &slaves {
            let size = self.mem_size(slave)?;
            if size == 0 {
                if self.is_addressed(slave)? {
                    return Err(NetlistError::EmptyWindow(self.interface_path(slave)));
                }
                continue;
            }
            if let Some(base) = self.interfaces[slave].explicit_base {
                if base % size != 0 {
                    return Err(NetlistError::Misaligned {
                        slave: self.interface_path(slave),
                        base,
                        size,
                    });
                }
            }
        }
        slaves
            .into_iter()
            .map(|slave| self.bind(master, slave))
            .collect()
    }

    /// Puts `dest` in the clock domain driven by `source`.
    ///
    /// Both must be clock/reset interfaces; the source drives only outputs
    /// and the destination reads only inputs. Ports are wired by type.
    pub fn connect_clock_domain(
        &mut self,
        source: InterfaceId,
        dest: InterfaceId,
    ) -> Result<(), NetlistError> {
        self.expect_class(source, InterfaceClass::ClkRst)?;
        self.expect_class(dest, InterfaceClass::ClkRst)?;
        let mismatch = |reason: &str| NetlistError::InterfaceMismatch {
            a: self.interface_path(source),
            b: self.interface_path(dest),
            reason: reason.to_string(),
        };
        let all = |id: InterfaceId, wanted: &[Direction]| {
            self.interfaces[id]
                .ports
                .iter()
                .all(|&p| wanted.contains(&self.ports[p].direction))
        };
        if !all(source, &[Direction::Out]) {
            return Err(mismatch("clock source ports must all be outputs"));
        }
        if !all(dest, &[Direction::In, Direction::Clock]) {
            return Err(mismatch("clock domain ports must all be inputs"));
        }
        if let Some(current) = self.interfaces[dest].clock_source {
            return Err(NetlistError::DuplicateBinding {
                master: self.ref_path(current),
                slave: self.interface_path(dest),
            });
        }
        self.connect_interface(source, dest)?;
        let source_ref: InterfaceRef = self.interface_ref(source);
        let dest_ref = self.interface_ref(dest);
        self.interfaces[source].clock_domain.push(dest_ref);
        self.interfaces[dest].clock_source = Some(source_ref);
        Ok(())
    }

    /// Interfaces clocked by `source`.
    pub fn clock_domain(&self, source: InterfaceId) -> Vec<InterfaceId> {
        self.interfaces
            .get(source)
            .map(|i| {
                i.clock_domain
                    .iter()
                    .filter_map(|&r| self.resolve_ref(r))
                    .collect()
            })
            .unwrap_or_default()
    }
}
