//! The project: owner of every instance, interface, port and connection.
//!
//! Objects live in arenas owned by [`Project`] and refer to each other by
//! id. Bindings that must survive instance removal (slave to master, clock
//! domains) are kept as name pairs ([`InterfaceRef`]) and resolved here.
//! Mutations are split by concern across `wiring.rs` and `binding.rs`; this
//! file holds lookups, placement and removal, generics and widths.

use pod_bus::BusLibrary;
use pod_common::{Ident, Interner};

use crate::allocmem::AllocMem;
use crate::arena::Arena;
use crate::component::{ComponentDef, GenericOpDef, WidthDef};
use crate::error::NetlistError;
use crate::generic::{parse_integer, Generic, GenericOp};
use crate::graph::ConnectionGraph;
use crate::ids::{InstanceId, InterfaceId, PortId};
use crate::instance::{auto_name, is_reserved_name, HdlFile, Instance};
use crate::interface::{Interface, InterfaceClass};
use crate::pin::PinRef;
use crate::port::{Port, Width};
use crate::register::Register;
use crate::slave::InterfaceRef;

/// A system under assembly.
pub struct Project {
    name: String,
    author: String,
    pub(crate) interner: Interner,
    pub(crate) buses: BusLibrary,
    pub(crate) instances: Arena<InstanceId, Instance>,
    pub(crate) interfaces: Arena<InterfaceId, Interface>,
    pub(crate) ports: Arena<PortId, Port>,
    pub(crate) graph: ConnectionGraph,
}

impl Project {
    /// Creates an empty project using the built-in bus descriptors.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_buses(name, BusLibrary::new())
    }

    /// Creates an empty project resolving bus names through `buses`.
    pub fn with_buses(name: impl Into<String>, buses: BusLibrary) -> Self {
        Self {
            name: name.into(),
            author: String::new(),
            interner: Interner::new(),
            buses,
            instances: Arena::new(),
            interfaces: Arena::new(),
            ports: Arena::new(),
            graph: ConnectionGraph::new(),
        }
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Author written in generated file headers.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Sets the author.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Pin adjacency.
    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    /// Unchecked pin adjacency, for tests that build broken netlists.
    #[cfg(any(test, feature = "testing"))]
    #[doc(hidden)]
    pub fn graph_mut(&mut self) -> &mut ConnectionGraph {
        &mut self.graph
    }

    /// Unchecked port access, for tests that build broken netlists.
    #[cfg(any(test, feature = "testing"))]
    #[doc(hidden)]
    pub fn port_mut(&mut self, id: PortId) -> Option<&mut Port> {
        self.ports.get_mut(id)
    }

    /// Resolves an interned name.
    pub fn name_of(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    // -- access --

    /// Live instances in placement order.
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances.iter()
    }

    /// Live interfaces.
    pub fn interfaces(&self) -> impl Iterator<Item = (InterfaceId, &Interface)> {
        self.interfaces.iter()
    }

    /// Live ports.
    pub fn ports(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.ports.iter()
    }

    /// Instance `id`, if live.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id)
    }

    /// Interface `id`, if live.
    pub fn interface(&self, id: InterfaceId) -> Option<&Interface> {
        self.interfaces.get(id)
    }

    /// Port `id`, if live.
    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id)
    }

    pub(crate) fn live_instance(&self, id: InstanceId) -> Result<&Instance, NetlistError> {
        self.instances.get(id).ok_or_else(|| NetlistError::NotFound {
            what: "instance",
            path: format!("#{}", id.as_raw()),
        })
    }

    pub(crate) fn live_interface(&self, id: InterfaceId) -> Result<&Interface, NetlistError> {
        self.interfaces.get(id).ok_or_else(|| NetlistError::NotFound {
            what: "interface",
            path: format!("#{}", id.as_raw()),
        })
    }

    pub(crate) fn live_port(&self, id: PortId) -> Result<&Port, NetlistError> {
        self.ports.get(id).ok_or_else(|| NetlistError::NotFound {
            what: "port",
            path: format!("#{}", id.as_raw()),
        })
    }

    // -- lookup by name --

    /// Instance named `name`.
    pub fn instance_named(&self, name: &str) -> Option<InstanceId> {
        let ident = self.interner.get(name)?;
        self.instance_by_ident(ident)
    }

    fn instance_by_ident(&self, ident: Ident) -> Option<InstanceId> {
        self.instances
            .iter()
            .find(|(_, inst)| inst.name == ident)
            .map(|(id, _)| id)
    }

    /// Interface `name` of `instance`.
    pub fn interface_named(&self, instance: InstanceId, name: &str) -> Option<InterfaceId> {
        let ident = self.interner.get(name)?;
        self.instances
            .get(instance)?
            .interfaces
            .iter()
            .copied()
            .find(|&id| self.interfaces[id].name == ident)
    }

    /// Port `name` of `interface`.
    pub fn port_named(&self, interface: InterfaceId, name: &str) -> Option<PortId> {
        let ident = self.interner.get(name)?;
        self.interfaces
            .get(interface)?
            .ports
            .iter()
            .copied()
            .find(|&id| self.ports[id].name == ident)
    }

    /// Instance by name, as an error on miss.
    pub fn find_instance(&self, name: &str) -> Result<InstanceId, NetlistError> {
        self.instance_named(name).ok_or_else(|| NetlistError::NotFound {
            what: "instance",
            path: name.to_string(),
        })
    }

    /// Interface at `instance.interface`.
    pub fn find_interface(&self, path: &str) -> Result<InterfaceId, NetlistError> {
        let not_found = || NetlistError::NotFound {
            what: "interface",
            path: path.to_string(),
        };
        let (instance, interface) = path.split_once('.').ok_or_else(not_found)?;
        let instance = self.instance_named(instance).ok_or_else(not_found)?;
        self.interface_named(instance, interface).ok_or_else(not_found)
    }

    /// Port at `instance.interface.port`.
    pub fn find_port(&self, path: &str) -> Result<PortId, NetlistError> {
        let not_found = || NetlistError::NotFound {
            what: "port",
            path: path.to_string(),
        };
        let (iface_path, port) = path.rsplit_once('.').ok_or_else(not_found)?;
        let iface = self.find_interface(iface_path).map_err(|_| not_found())?;
        self.port_named(iface, port).ok_or_else(not_found)
    }

    /// Resolves a name-based interface reference.
    pub fn resolve_ref(&self, r: InterfaceRef) -> Option<InterfaceId> {
        let instance = self.instance_by_ident(r.instance)?;
        self.instances[instance]
            .interfaces
            .iter()
            .copied()
            .find(|&id| self.interfaces[id].name == r.interface)
    }

    /// Name-based reference to a live interface.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live.
    pub fn interface_ref(&self, id: InterfaceId) -> InterfaceRef {
        let iface = &self.interfaces[id];
        InterfaceRef::new(self.instances[iface.instance].name, iface.name)
    }

    // -- paths --

    /// Name of a live instance, or `#<id>` for a removed one.
    pub fn instance_path(&self, id: InstanceId) -> String {
        match self.instances.get(id) {
            Some(inst) => self.name_of(inst.name).to_string(),
            None => format!("#{}", id.as_raw()),
        }
    }

    /// `instance.interface`.
    pub fn interface_path(&self, id: InterfaceId) -> String {
        match self.interfaces.get(id) {
            Some(iface) => format!(
                "{}.{}",
                self.instance_path(iface.instance),
                self.name_of(iface.name)
            ),
            None => format!("#{}", id.as_raw()),
        }
    }

    /// `instance.interface.port`.
    pub fn port_path(&self, id: PortId) -> String {
        match self.ports.get(id) {
            Some(port) => format!(
                "{}.{}",
                self.interface_path(port.interface),
                self.name_of(port.name)
            ),
            None => format!("#{}", id.as_raw()),
        }
    }

    /// `instance.interface.port[index]`.
    pub fn pin_path(&self, pin: PinRef) -> String {
        format!("{}[{}]", self.port_path(pin.port), pin.index)
    }

    /// `instance.interface` of a name reference.
    pub fn ref_path(&self, r: InterfaceRef) -> String {
        format!("{}.{}", self.name_of(r.instance), self.name_of(r.interface))
    }

    // -- placement --

    /// Places an instance of `def`.
    ///
    /// Without a `name`, the instance is named `<component><NN>` with the
    /// first free two-digit number. An explicit name must be unique and must
    /// not look like an automatic name of the same component.
    pub fn add_instance(
        &mut self,
        def: &ComponentDef,
        name: Option<&str>,
    ) -> Result<InstanceId, NetlistError> {
        self.place(def, name, false)
    }

    /// Places a tool-generated instance, such as an Intercon, under `name`.
    pub fn add_generated_instance(
        &mut self,
        def: &ComponentDef,
        name: &str,
    ) -> Result<InstanceId, NetlistError> {
        self.place(def, Some(name), true)
    }

    fn place(
        &mut self,
        def: &ComponentDef,
        name: Option<&str>,
        generated: bool,
    ) -> Result<InstanceId, NetlistError> {
        let (name, num) = match name {
            Some(name) => {
                if !generated && is_reserved_name(name, &def.name) {
                    return Err(NetlistError::ReservedName {
                        name: name.to_string(),
                        component: def.name.clone(),
                    });
                }
                if self.instance_named(name).is_some() {
                    return Err(NetlistError::DuplicateName(name.to_string()));
                }
                (name.to_string(), self.count_of_component(&def.name))
            }
            None => {
                let mut num = 0;
                while self.instance_named(&auto_name(&def.name, num)).is_some() {
                    num += 1;
                }
                (auto_name(&def.name, num), num)
            }
        };
        check_definition(def)?;
        let buses = def
            .interfaces
            .iter()
            .map(|idef| idef.bus.as_deref().map(|bus| self.buses.get(bus)).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        let instance_id = self.instances.next_id();
        let mut interface_ids = Vec::with_capacity(def.interfaces.len());
        for (idef, bus) in def.interfaces.iter().zip(buses) {
            let interface_id = self.interfaces.next_id();
            let mut port_ids = Vec::with_capacity(idef.ports.len());
            for pdef in &idef.ports {
                let port_id = self.ports.next_id();
                let width = match &pdef.width {
                    WidthDef::Literal(n) => Width::Literal(*n),
                    WidthDef::Generic(g) => Width::Generic(self.interner.get_or_intern(g)),
                };
                self.ports.alloc(Port {
                    id: port_id,
                    name: self.interner.get_or_intern(&pdef.name),
                    interface: interface_id,
                    direction: pdef.direction,
                    width,
                    port_type: pdef.port_type.clone(),
                    variable: pdef.variable,
                    force: None,
                    unconnected: pdef.unconnected,
                });
                port_ids.push(port_id);
            }
            let registers = idef
                .registers
                .iter()
                .map(|r| Register {
                    name: self.interner.get_or_intern(&r.name),
                    offset: r.offset,
                    access: r.access,
                    description: r.description.clone(),
                })
                .collect();
            let alloc = (idef.class == InterfaceClass::Master && bus.is_some())
                .then(AllocMem::new);
            self.interfaces.alloc(Interface {
                id: interface_id,
                name: self.interner.get_or_intern(&idef.name),
                instance: instance_id,
                class: idef.class,
                bus,
                ports: port_ids,
                registers,
                data_size: idef.data_size,
                explicit_base: idef.base,
                alloc,
                master: None,
                clock_domain: Vec::new(),
                clock_source: None,
            });
            interface_ids.push(interface_id);
        }
        let generics = def
            .generics
            .iter()
            .map(|g| Generic {
                name: self.interner.get_or_intern(&g.name),
                value: g.value.clone(),
                ty: g.ty.clone(),
                op: g.op.as_ref().map(|GenericOpDef::RealSizeOf(port)| {
                    GenericOp::RealSizeOf(self.interner.get_or_intern(port))
                }),
                public: g.public,
                destination: g.destination,
                description: g.description.clone(),
            })
            .collect();
        self.instances.alloc(Instance {
            id: instance_id,
            name: self.interner.get_or_intern(&name),
            component: self.interner.get_or_intern(&def.name),
            num,
            interfaces: interface_ids,
            generics,
            hdl_files: def.hdl_files.clone(),
            generated,
        });
        log::info!("added instance {name} of {}", def.name);
        Ok(instance_id)
    }

    fn count_of_component(&self, component: &str) -> u32 {
        let Some(ident) = self.interner.get(component) else {
            return 0;
        };
        self.instances
            .values()
            .filter(|inst| inst.component == ident)
            .count() as u32
    }

    /// Records an HDL source of `instance`, replacing one with the same path.
    pub fn add_hdl_file(&mut self, instance: InstanceId, file: HdlFile) -> Result<(), NetlistError> {
        self.live_instance(instance)?;
        let files = &mut self.instances[instance].hdl_files;
        files.retain(|f| f.path != file.path);
        files.push(file);
        Ok(())
    }

    /// Removes an instance with all its connections, bindings and clock
    /// domain records.
    ///
    /// Every record to be cleaned up is checked first; a one-sided
    /// connection or a binding missing from its master's allocator aborts the
    /// removal with the project unchanged.
    pub fn remove_instance(&mut self, id: InstanceId) -> Result<(), NetlistError> {
        let interface_ids = self.live_instance(id)?.interfaces.clone();
        for &iid in &interface_ids {
            self.check_removable(iid)?;
        }

        for &iid in &interface_ids {
            let me = self.interface_ref(iid);
            if let Some(master_ref) = self.interfaces[iid].master.take() {
                let master_path = self.ref_path(master_ref);
                let slave_path = self.interface_path(iid);
                if let Some(mid) = self.resolve_ref(master_ref) {
                    if let Some(alloc) = self.interfaces[mid].alloc.as_mut() {
                        alloc
                            .unbind(me)
                            .map_err(|e| NetlistError::from_alloc(e, master_path, slave_path))?;
                    }
                }
            }
            let slaves: Vec<InterfaceRef> = self.interfaces[iid]
                .alloc
                .as_ref()
                .map(|a| a.windows().iter().map(|w| w.binding.slave).collect())
                .unwrap_or_default();
            for slave in slaves {
                if let Some(sid) = self.resolve_ref(slave) {
                    self.interfaces[sid].master = None;
                }
            }
            for dest in std::mem::take(&mut self.interfaces[iid].clock_domain) {
                if let Some(did) = self.resolve_ref(dest) {
                    self.interfaces[did].clock_source = None;
                }
            }
            if let Some(source) = self.interfaces[iid].clock_source.take() {
                if let Some(sid) = self.resolve_ref(source) {
                    self.interfaces[sid].clock_domain.retain(|r| *r != me);
                }
            }
        }

        for &iid in &interface_ids {
            for pid in self.interfaces[iid].ports.clone() {
                let pins: Vec<u32> = self.graph.connected_pins(pid).collect();
                for index in pins {
                    let pin = PinRef::new(pid, index);
                    self.graph.sever(pin).map_err(|e| self.graph_error(e))?;
                }
            }
        }

        let name = self.instance_path(id);
        for iid in interface_ids {
            if let Some(iface) = self.interfaces.remove(iid) {
                for pid in iface.ports {
                    self.ports.remove(pid);
                }
            }
        }
        self.instances.remove(id);
        log::info!("removed instance {name}");
        Ok(())
    }

    fn check_removable(&self, iid: InterfaceId) -> Result<(), NetlistError> {
        let iface = &self.interfaces[iid];
        for &pid in &iface.ports {
            for index in self.graph.connected_pins(pid) {
                let pin = PinRef::new(pid, index);
                if let Some(other) = self.graph.neighbours(pin).find(|&n| !self.graph.is_linked(pin, n)) {
                    return Err(NetlistError::Asymmetric(
                        self.pin_path(pin),
                        self.pin_path(other),
                    ));
                }
            }
        }
        if let Some(master_ref) = iface.master {
            let bound = self
                .resolve_ref(master_ref)
                .and_then(|mid| self.interfaces[mid].alloc.as_ref())
                .is_some_and(|alloc| alloc.window(self.interface_ref(iid)).is_some());
            if !bound {
                return Err(NetlistError::DanglingBinding(self.ref_path(master_ref)));
            }
        }
        Ok(())
    }

    // -- generics and widths --

    fn generic_path(&self, instance: InstanceId, name: &str) -> String {
        format!("{}.{}", self.instance_path(instance), name)
    }

    /// Current value of a generic. Computed generics are evaluated.
    pub fn generic_value(&self, instance: InstanceId, name: &str) -> Result<String, NetlistError> {
        let inst = self.live_instance(instance)?;
        let generic = self
            .interner
            .get(name)
            .and_then(|ident| inst.generic(ident))
            .ok_or_else(|| NetlistError::NotFound {
                what: "generic",
                path: self.generic_path(instance, name),
            })?;
        match generic.op {
            Some(GenericOp::RealSizeOf(port_name)) => {
                let port = self.port_of_instance(instance, port_name).ok_or_else(|| {
                    NetlistError::NotFound {
                        what: "port",
                        path: self.generic_path(instance, self.name_of(port_name)),
                    }
                })?;
                Ok(self.real_size(port).to_string())
            }
            None => Ok(generic.value.clone()),
        }
    }

    fn port_of_instance(&self, instance: InstanceId, name: Ident) -> Option<PortId> {
        self.instances[instance]
            .interfaces
            .iter()
            .flat_map(|&iid| self.interfaces[iid].ports.iter().copied())
            .find(|&pid| self.ports[pid].name == name)
    }

    /// Sets a generic's value.
    ///
    /// Windows of the instance's bound slaves are resized to follow address
    /// or data widths given by the generic. If a resized window would no
    /// longer be aligned on its explicit base, nothing changes.
    pub fn set_generic(
        &mut self,
        instance: InstanceId,
        name: &str,
        value: &str,
    ) -> Result<(), NetlistError> {
        let path = self.generic_path(instance, name);
        let ident = self.interner.get(name);
        let inst = self.live_instance(instance)?;
        let generic = ident
            .and_then(|ident| inst.generic(ident))
            .ok_or_else(|| NetlistError::NotFound {
                what: "generic",
                path: path.clone(),
            })?;
        if generic.op.is_some() {
            return Err(NetlistError::ComputedGeneric(path));
        }
        let ident = generic.name;

        let old = self.replace_generic(instance, ident, value.to_string());
        let resized = match self.resized_windows(instance) {
            Ok(resized) => resized,
            Err(err) => {
                self.replace_generic(instance, ident, old);
                return Err(err);
            }
        };
        for (master, slave, size) in resized {
            let master_path = self.interface_path(master);
            let slave_path = self.ref_path(slave);
            if let Some(alloc) = self.interfaces[master].alloc.as_mut() {
                alloc
                    .resize(slave, size)
                    .map_err(|e| NetlistError::from_alloc(e, master_path, slave_path))?;
            }
        }
        log::debug!("set generic {path} = {value}");
        Ok(())
    }

    fn replace_generic(&mut self, instance: InstanceId, name: Ident, value: String) -> String {
        match self.instances[instance].generic_mut(name) {
            Some(generic) => std::mem::replace(&mut generic.value, value),
            None => value,
        }
    }

    fn resized_windows(
        &self,
        instance: InstanceId,
    ) -> Result<Vec<(InterfaceId, InterfaceRef, u64)>, NetlistError> {
        let mut resized = Vec::new();
        for &iid in &self.instances[instance].interfaces {
            let Some(master_ref) = self.interfaces[iid].master else {
                continue;
            };
            let master = self
                .resolve_ref(master_ref)
                .ok_or_else(|| NetlistError::DanglingBinding(self.ref_path(master_ref)))?;
            let me = self.interface_ref(iid);
            let Some(window) = self.interfaces[master]
                .alloc
                .as_ref()
                .and_then(|a| a.window(me))
            else {
                continue;
            };
            if !window.is_addressed() {
                continue;
            }
            let size = self.mem_size(iid)?;
            if size == 0 {
                return Err(NetlistError::EmptyWindow(self.interface_path(iid)));
            }
            if window.explicit && window.base % size != 0 {
                return Err(NetlistError::Misaligned {
                    slave: self.interface_path(iid),
                    base: window.base,
                    size,
                });
            }
            if size != window.size {
                resized.push((master, me, size));
            }
        }
        Ok(resized)
    }

    /// Width of a port in bits, resolving generic widths.
    pub fn port_width(&self, port: PortId) -> Result<u32, NetlistError> {
        let p = self.live_port(port)?;
        match p.width {
            Width::Literal(n) => Ok(n),
            Width::Generic(generic) => {
                let instance = self.interfaces[p.interface].instance;
                let unresolved = || NetlistError::UnresolvedWidth {
                    port: self.port_path(port),
                    generic: self.name_of(generic).to_string(),
                };
                let value = self.generic_value(instance, self.name_of(generic));
                value
                    .ok()
                    .as_deref()
                    .and_then(parse_integer)
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(unresolved)
            }
        }
    }
}

fn check_definition(def: &ComponentDef) -> Result<(), NetlistError> {
    let duplicate = |what: &'static str, name: &str| NetlistError::DuplicateDefinition {
        what,
        name: name.to_string(),
        component: def.name.clone(),
    };
    let mut interfaces = std::collections::BTreeSet::new();
    let mut ports = std::collections::BTreeSet::new();
    for idef in &def.interfaces {
        if !interfaces.insert(idef.name.as_str()) {
            return Err(duplicate("interface", &idef.name));
        }
        for pdef in &idef.ports {
            if !ports.insert(pdef.name.as_str()) {
                return Err(duplicate("port", &pdef.name));
            }
        }
    }
    let mut generics = std::collections::BTreeSet::new();
    for g in &def.generics {
        if !generics.insert(g.name.as_str()) {
            return Err(duplicate("generic", &g.name));
        }
        if let Some(GenericOpDef::RealSizeOf(port)) = &g.op {
            if !ports.contains(port.as_str()) {
                return Err(NetlistError::NotFound {
                    what: "port",
                    path: format!("{}.{}", def.name, port),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn automatic_names_take_first_free_number() {
        let mut project = Project::new("demo");
        let led = fixtures::wb_slave("led", 2, 16);
        let a = project.add_instance(&led, None).unwrap();
        let b = project.add_instance(&led, None).unwrap();
        assert_eq!(project.instance_path(a), "led00");
        assert_eq!(project.instance_path(b), "led01");
        project.remove_instance(a).unwrap();
        let c = project.add_instance(&led, None).unwrap();
        assert_eq!(project.instance_path(c), "led00");
        assert_ne!(a, c);
    }

    #[test]
    fn reserved_and_duplicate_names_are_refused() {
        let mut project = Project::new("demo");
        let led = fixtures::wb_slave("led", 2, 16);
        let err = project.add_instance(&led, Some("led03")).unwrap_err();
        assert!(matches!(err, NetlistError::ReservedName { .. }));
        project.add_instance(&led, Some("status")).unwrap();
        let err = project.add_instance(&led, Some("status")).unwrap_err();
        assert!(matches!(err, NetlistError::DuplicateName(_)));
    }

    #[test]
    fn unknown_bus_fails_placement_cleanly() {
        let mut project = Project::new("demo");
        let def = ComponentDef::new("odd").interface(
            crate::component::InterfaceDef::new("s", InterfaceClass::Slave).bus("pcie"),
        );
        let err = project.add_instance(&def, None).unwrap_err();
        assert!(matches!(err, NetlistError::Bus(_)));
        assert_eq!(project.instances().count(), 0);
        assert_eq!(project.interfaces().count(), 0);
    }

    #[test]
    fn duplicate_port_names_are_refused() {
        use crate::component::{InterfaceDef, PortDef};
        use crate::direction::Direction;
        let def = ComponentDef::new("dup")
            .interface(InterfaceDef::new("a", InterfaceClass::Gls).port(PortDef::new("x", Direction::In, 1)))
            .interface(InterfaceDef::new("b", InterfaceClass::Gls).port(PortDef::new("x", Direction::Out, 1)));
        let err = Project::new("demo").add_instance(&def, None).unwrap_err();
        assert!(matches!(err, NetlistError::DuplicateDefinition { what: "port", .. }));
    }

    #[test]
    fn paths_resolve_both_ways() {
        let mut project = Project::new("demo");
        project.add_instance(&fixtures::wb_slave("led", 2, 16), None).unwrap();
        let port = project.find_port("led00.swb.wbs_ack").unwrap();
        assert_eq!(project.port_path(port), "led00.swb.wbs_ack");
        assert_eq!(
            project.pin_path(PinRef::new(port, 0)),
            "led00.swb.wbs_ack[0]"
        );
        assert!(matches!(
            project.find_port("led00.swb.nope"),
            Err(NetlistError::NotFound { what: "port", .. })
        ));
        assert!(project.find_interface("led00").is_err());
    }

    #[test]
    fn generic_width_follows_generic_value() {
        let mut project = Project::new("demo");
        let id = project
            .add_instance(&fixtures::generic_slave("ram", 4), None)
            .unwrap();
        let adr = project.find_port("ram00.swb.wbs_adr").unwrap();
        assert_eq!(project.port_width(adr).unwrap(), 4);
        project.set_generic(id, "ADDR_WIDTH", "6").unwrap();
        assert_eq!(project.port_width(adr).unwrap(), 6);
        project.set_generic(id, "ADDR_WIDTH", "wide").unwrap();
        assert!(matches!(
            project.port_width(adr),
            Err(NetlistError::UnresolvedWidth { .. })
        ));
    }

    #[test]
    fn computed_generics_cannot_be_set() {
        let mut project = Project::new("demo");
        let id = project
            .add_instance(&fixtures::generic_slave("ram", 4), None)
            .unwrap();
        let err = project.set_generic(id, "RAM_SIZE", "3").unwrap_err();
        assert!(matches!(err, NetlistError::ComputedGeneric(_)));
        assert_eq!(project.generic_value(id, "RAM_SIZE").unwrap(), "0");
    }

    #[test]
    fn remove_refuses_one_sided_connection() {
        let mut project = Project::new("demo");
        let led = project
            .add_instance(&fixtures::wb_slave("led", 2, 16), None)
            .unwrap();
        let ack = project.find_port("led00.swb.wbs_ack").unwrap();
        let cpu = project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let m_ack = project.find_port("cpu00.mwb.wbm_ack").unwrap();
        project
            .graph
            .insert_one_sided(PinRef::new(ack, 0), PinRef::new(m_ack, 0));
        let err = project.remove_instance(led).unwrap_err();
        assert!(matches!(err, NetlistError::Asymmetric(..)));
        assert!(project.instance(led).is_some());
        assert!(project.instance(cpu).is_some());
    }
}
