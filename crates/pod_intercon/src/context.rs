//! The read-only plan of one Intercon.
//!
//! Planning gathers everything a generator needs from the [`Project`]:
//! resolved widths, mirrored port names and directions, base addresses and
//! the signal role of every port. Generators never touch the project.

use pod_bus::{BusClass, Protocol, Role};
use pod_common::InternalError;
use pod_netlist::{Direction, InstanceId, InterfaceId, NetlistError, PortId, Project};

use crate::error::InterconError;

/// A port of a bridged interface as the Intercon sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPort {
    /// The original port.
    pub port: PortId,
    /// Name on the Intercon: `<instance>_<port>`.
    pub name: String,
    /// Direction on the Intercon, the inverse of the original's.
    pub direction: Direction,
    /// Resolved width in bits.
    pub width: u32,
    /// Port-type tag of the original, if any.
    pub port_type: Option<String>,
    /// Bus role of the original, if its type maps to one.
    pub role: Option<Role>,
}

/// A master or slave interface bridged by an Intercon.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// The original interface.
    pub interface: InterfaceId,
    /// Owning instance name.
    pub instance: String,
    /// Interface name.
    pub name: String,
    /// Address width in bits, 0 without an address port.
    pub addr_size: u32,
    /// Data width in bits.
    pub data_size: u32,
    /// Base address of a slave window; 0 for the master.
    pub base: u64,
    /// Mirrored ports in declaration order.
    pub ports: Vec<MirrorPort>,
}

impl Endpoint {
    fn build(
        project: &Project,
        interface: InterfaceId,
        class: BusClass,
    ) -> Result<Self, InterconError> {
        let path = project.interface_path(interface);
        let iface = project.interface(interface).ok_or_else(|| NetlistError::NotFound {
            what: "interface",
            path: path.clone(),
        })?;
        let bus = iface
            .bus
            .as_ref()
            .ok_or_else(|| NetlistError::NotBus(path.clone()))?;
        let instance = project
            .instance(iface.instance)
            .map(|i| project.name_of(i.name).to_string())
            .ok_or_else(|| InternalError::new(format!("{path} belongs to a removed instance")))?;

        let mut ports = Vec::with_capacity(iface.ports.len());
        for &pid in &iface.ports {
            let port = project.port(pid).ok_or_else(|| NetlistError::NotFound {
                what: "port",
                path: project.port_path(pid),
            })?;
            ports.push(MirrorPort {
                port: pid,
                name: format!("{instance}_{}", project.name_of(port.name)),
                direction: port.direction.mirrored(),
                width: project.port_width(pid)?,
                port_type: port.port_type.clone(),
                role: port
                    .port_type
                    .as_deref()
                    .and_then(|ty| bus.role_of(class, ty)),
            });
        }

        let base = match class {
            BusClass::Master => 0,
            BusClass::Slave => project
                .base_address(interface)
                .ok_or_else(|| InternalError::new(format!("bound slave {path} has no window")))?,
        };

        let endpoint = Self {
            interface,
            instance,
            name: project.name_of(iface.name).to_string(),
            addr_size: project.addr_size(interface)?,
            data_size: project.data_size(interface)?,
            base,
            ports,
        };
        for role in bus.protocol().required_roles(class) {
            endpoint.require(role)?;
        }
        Ok(endpoint)
    }

    /// `instance.interface`.
    pub fn path(&self) -> String {
        format!("{}.{}", self.instance, self.name)
    }

    /// Name of the mirror interface on the Intercon.
    pub fn mirror_name(&self) -> String {
        format!("{}_{}", self.instance, self.name)
    }

    /// Chip-select signal of this slave.
    pub fn cs_name(&self) -> String {
        format!("{}_{}_cs", self.instance, self.name)
    }

    /// Read-data signal rebuilt to the master's width.
    pub fn readdata_name(&self) -> String {
        format!("{}_{}_readdata_s", self.instance, self.name)
    }

    /// Mirror port carrying `role`.
    pub fn signal(&self, role: impl Into<Role>) -> Option<&MirrorPort> {
        let role = role.into();
        self.ports.iter().find(|p| p.role == Some(role))
    }

    /// Whether a port carries `role`.
    pub fn has(&self, role: impl Into<Role>) -> bool {
        self.signal(role).is_some()
    }

    /// Mirror port carrying `role`, or a [`InterconError::MissingRole`].
    pub fn require(&self, role: impl Into<Role>) -> Result<&MirrorPort, InterconError> {
        let role = role.into();
        self.signal(role).ok_or_else(|| InterconError::MissingRole {
            interface: self.path(),
            role,
        })
    }

    /// Mirror name of the port carrying `role`.
    pub fn name_of(&self, role: impl Into<Role>) -> Result<&str, InterconError> {
        self.require(role).map(|p| p.name.as_str())
    }

    /// Low address bits selecting a byte within one data word.
    pub fn byte_shift(&self) -> u32 {
        byte_shift(self.data_size)
    }
}

/// `log2` of the number of bytes in a `width`-bit word.
pub fn byte_shift(width: u32) -> u32 {
    (width / 8).max(1).trailing_zeros()
}

/// Everything needed to generate one Intercon.
#[derive(Debug, Clone)]
pub struct InterconContext {
    /// Project name, for the file header.
    pub project: String,
    /// Author, for the file header.
    pub author: String,
    /// Instance name: `<master instance>_<master interface>_intercon`.
    pub instance: String,
    /// Component and entity name: `<master instance>_<master interface>`.
    pub component: String,
    /// One-line description for the file header.
    pub description: String,
    /// Protocol of the master's bus.
    pub protocol: Protocol,
    /// Level at which the master's reset is asserted, `'1'` or `'0'`.
    pub reset_level: char,
    /// The master.
    pub master: Endpoint,
    /// Bound slaves in binding order.
    pub slaves: Vec<Endpoint>,
    /// A previously generated Intercon of the same name.
    pub replaces: Option<InstanceId>,
}

impl InterconContext {
    /// Plans the Intercon of `master` without changing the project.
    ///
    /// Fails when `master` is not a bus master, when a required role is
    /// missing, when a bridged port is forced or connected to anything but
    /// the Intercon being replaced, or when the Intercon name belongs to a
    /// user instance.
    pub fn plan(project: &Project, master: InterfaceId) -> Result<Self, InterconError> {
        let path = project.interface_path(master);
        let iface = project
            .interface(master)
            .ok_or_else(|| InterconError::NotMaster(path.clone()))?;
        if iface.class.bus_class() != Some(BusClass::Master) {
            return Err(InterconError::NotMaster(path));
        }
        let bus = iface
            .bus
            .as_ref()
            .ok_or_else(|| InterconError::NotMaster(path.clone()))?;
        let protocol = bus.protocol();
        let reset_level = if bus.reset_active_low() { '0' } else { '1' };

        let master = Endpoint::build(project, master, BusClass::Master)?;
        let slaves = project
            .bound_slaves(master.interface)?
            .into_iter()
            .map(|s| Endpoint::build(project, s, BusClass::Slave))
            .collect::<Result<Vec<_>, _>>()?;

        let component = master.mirror_name();
        let instance = format!("{component}_intercon");
        let replaces = match project.instance_named(&instance) {
            Some(id) if project.instance(id).is_some_and(|i| i.generated) => Some(id),
            Some(_) => return Err(InterconError::NameTaken(instance)),
            None => None,
        };

        let ctx = Self {
            project: project.name().to_string(),
            author: project.author().to_string(),
            description: format!("Connect slaves to {} from {}", master.name, master.instance),
            instance,
            component,
            protocol,
            reset_level,
            master,
            slaves,
            replaces,
        };
        ctx.check_boundary(project)?;
        Ok(ctx)
    }

    /// Slaves first, then the master: the order of the Intercon's
    /// interfaces.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.slaves.iter().chain(std::iter::once(&self.master))
    }

    fn check_boundary(&self, project: &Project) -> Result<(), InterconError> {
        let owner = |pin: pod_netlist::PinRef| {
            project
                .port(pin.port)
                .and_then(|p| project.interface(p.interface))
                .map(|i| i.instance)
        };
        for endpoint in self.endpoints() {
            for mp in &endpoint.ports {
                if project.port(mp.port).is_some_and(|p| p.is_forced()) {
                    return Err(NetlistError::ForcedPort(project.port_path(mp.port)).into());
                }
                for index in project.graph().connected_pins(mp.port) {
                    let pin = pod_netlist::PinRef::new(mp.port, index);
                    let foreign = project
                        .graph()
                        .neighbours(pin)
                        .any(|n| self.replaces.is_none() || owner(n) != self.replaces);
                    if foreign {
                        return Err(InterconError::BoundaryConnected {
                            port: project.port_path(mp.port),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_bus::WishboneRole;
    use pod_netlist::fixtures;

    fn bus_pair() -> (Project, InterfaceId, InterfaceId) {
        let mut p = Project::new("demo");
        p.set_author("ada");
        let cpu = p.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let ram = p.add_instance(&fixtures::wb_slave("ram", 4, 16), None).unwrap();
        let m = p.interface_named(cpu, "mwb").unwrap();
        let s = p.interface_named(ram, "swb").unwrap();
        p.bind(m, s).unwrap();
        (p, m, s)
    }

    #[test]
    fn plan_names_and_mirrors() {
        let (p, m, _) = bus_pair();
        let ctx = InterconContext::plan(&p, m).unwrap();
        assert_eq!(ctx.instance, "cpu00_mwb_intercon");
        assert_eq!(ctx.component, "cpu00_mwb");
        assert_eq!(ctx.description, "Connect slaves to mwb from cpu00");
        assert_eq!(ctx.author, "ada");
        assert_eq!(ctx.protocol, Protocol::Wishbone);

        let names: Vec<_> = ctx.endpoints().map(|e| e.mirror_name()).collect();
        assert_eq!(names, ["ram00_swb", "cpu00_mwb"]);

        let adr = ctx.master.require(WishboneRole::Address).unwrap();
        assert_eq!(adr.name, "cpu00_wbm_adr");
        assert_eq!(adr.direction, Direction::In);
        assert_eq!(adr.width, 16);

        let slave = &ctx.slaves[0];
        assert_eq!(slave.data_size, 16);
        assert_eq!(slave.byte_shift(), 1);
        assert_eq!(slave.cs_name(), "ram00_swb_cs");
        assert_eq!(
            slave.signal(WishboneRole::DataOut).map(|p| p.name.as_str()),
            Some("ram00_wbs_dat_o")
        );
    }

    #[test]
    fn slave_is_not_a_master() {
        let (p, _, s) = bus_pair();
        assert!(matches!(
            InterconContext::plan(&p, s),
            Err(InterconError::NotMaster(path)) if path == "ram00.swb"
        ));
    }

    #[test]
    fn user_instance_holds_the_name() {
        let (mut p, m, _) = bus_pair();
        p.add_instance(&fixtures::gpio("blk", 1), Some("cpu00_mwb_intercon"))
            .unwrap();
        assert!(matches!(
            InterconContext::plan(&p, m),
            Err(InterconError::NameTaken(name)) if name == "cpu00_mwb_intercon"
        ));
    }

    #[test]
    fn connected_boundary_port_is_rejected() {
        let (mut p, m, _) = bus_pair();
        p.add_instance(&fixtures::gpio("io", 1), None).unwrap();
        let stb = p.find_port("cpu00.mwb.wbm_stb").unwrap();
        let din = p.find_port("io00.pins.din").unwrap();
        p.connect_port(stb, din).unwrap();
        assert!(matches!(
            InterconContext::plan(&p, m),
            Err(InterconError::BoundaryConnected { port }) if port == "cpu00.mwb.wbm_stb"
        ));
    }

    #[test]
    fn byte_shift_per_width() {
        assert_eq!(byte_shift(8), 0);
        assert_eq!(byte_shift(16), 1);
        assert_eq!(byte_shift(32), 2);
        assert_eq!(byte_shift(64), 3);
    }
}
