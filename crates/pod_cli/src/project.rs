//! Turning a `pod.toml` into a live [`Project`].
//!
//! Instances are placed first, then bindings (explicit, then automatic),
//! connections, clock domains and forced ports, each in file order. The
//! first failing step aborts the load.

use std::error::Error;
use std::path::{Path, PathBuf};

use pod_bus::BusLibrary;
use pod_config::{
    InstanceConfig, InterfaceConfig, PortConfig, ProjectConfig, ResolvedPaths, SizeValue,
    CONFIG_FILE,
};
use pod_netlist::{
    parse_integer, Access, ComponentDef, GenericDef, GenericOpDef, InterfaceClass, InterfaceDef,
    PinRef, PortDef, Project, RegisterDef,
};

use crate::GlobalArgs;

/// A project file together with the netlist it describes.
pub struct Loaded {
    /// The parsed file.
    pub config: ProjectConfig,
    /// Directories the file refers to.
    pub paths: ResolvedPaths,
    /// The assembled netlist.
    pub project: Project,
}

/// Resolves the project root directory from global CLI args.
///
/// `--config` may name the project file or its directory. Without it the
/// current directory and its parents are searched for `pod.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn Error>> {
    match &global.config {
        Some(config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_file() {
                Ok(p.parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")))
            } else {
                Ok(p)
            }
        }
        None => find_project_root(&std::env::current_dir()?),
    }
}

/// Walks up from `start` to the nearest directory holding `pod.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the project selected by the global args.
pub fn load(global: &GlobalArgs) -> Result<Loaded, Box<dyn Error>> {
    let root = resolve_project_root(global)?;
    let config = pod_config::load_config(&root)?;
    let paths = pod_config::resolve_paths(&config, &root);
    let project = build_project(&config, &paths)?;
    Ok(Loaded {
        config,
        paths,
        project,
    })
}

/// Assembles the netlist described by `config`.
pub fn build_project(
    config: &ProjectConfig,
    paths: &ResolvedPaths,
) -> Result<Project, Box<dyn Error>> {
    let buses = match &paths.busses {
        Some(dir) => BusLibrary::with_dir(dir),
        None => BusLibrary::new(),
    };
    let mut project = Project::with_buses(&config.project.name, buses);
    project.set_author(&config.project.author);

    for (name, instance) in &config.instances {
        let def = component_def(name, instance)?;
        project.add_instance(&def, Some(name.as_str()))?;
    }
    for bind in &config.bind {
        let master = project.find_interface(&bind.master)?;
        let slave = project.find_interface(&bind.slave)?;
        project.bind(master, slave)?;
    }
    for bus in &config.auto_connect {
        project.auto_connect_bus(bus)?;
    }
    for connect in &config.connect {
        connect_endpoints(&mut project, &connect.from, &connect.to)?;
    }
    for domain in &config.clock_domain {
        let source = project.find_interface(&domain.source)?;
        let dest = project.find_interface(&domain.dest)?;
        project.connect_clock_domain(source, dest)?;
    }
    for force in &config.force {
        let port = project.find_port(&force.port)?;
        project.set_force(port, force.value.parse()?)?;
    }
    log::info!(
        "loaded project {} with {} instance(s)",
        config.project.name,
        config.instances.len()
    );
    Ok(project)
}

fn component_def(name: &str, instance: &InstanceConfig) -> Result<ComponentDef, Box<dyn Error>> {
    let mut def = ComponentDef::new(&instance.component);
    for (generic, value) in &instance.generics {
        let mut g = GenericDef::natural(generic, 0);
        g.value = value.clone();
        if parse_integer(value).is_none() {
            g.ty = "string".to_string();
        }
        def = def.generic(g);
    }
    for (generic, port) in &instance.computed {
        let mut g = GenericDef::natural(generic, 0);
        g.op = Some(GenericOpDef::RealSizeOf(port.clone()));
        g.public = false;
        def = def.generic(g);
    }
    for iface in &instance.interfaces {
        def = def.interface(interface_def(name, iface)?);
    }
    Ok(def)
}

fn interface_def(instance: &str, iface: &InterfaceConfig) -> Result<InterfaceDef, Box<dyn Error>> {
    let class: InterfaceClass = iface.class.parse()?;
    let mut def = InterfaceDef::new(&iface.name, class);
    def.bus = iface.bus.clone();
    def.data_size = iface.data_size;
    def.base = iface.base;
    for port in &iface.ports {
        def = def.port(port_def(instance, &iface.name, port)?);
    }
    for reg in &iface.registers {
        let access: Access = reg.access.parse()?;
        def.registers.push(RegisterDef {
            name: reg.name.clone(),
            offset: reg.offset,
            access,
            description: reg.description.clone(),
        });
    }
    Ok(def)
}

fn port_def(instance: &str, iface: &str, port: &PortConfig) -> Result<PortDef, Box<dyn Error>> {
    let direction = port.dir.parse()?;
    let mut def = match &port.size {
        SizeValue::Bits(n) => PortDef::new(&port.name, direction, *n),
        SizeValue::Generic(g) => PortDef::new(&port.name, direction, 1).sized_by(g),
    };
    if let Some(ty) = &port.port_type {
        def = def.typed(ty);
    }
    if port.variable {
        def = def.variable();
    }
    def.unconnected = match port.unconnected {
        None => None,
        Some(0) => Some(false),
        Some(1) => Some(true),
        Some(other) => {
            return Err(format!(
                "port {instance}.{iface}.{}: unconnected value must be 0 or 1, not {other}",
                port.name
            )
            .into())
        }
    };
    Ok(def)
}

/// An endpoint of a `[[connect]]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint<'a> {
    Interface(&'a str),
    Port(&'a str),
    Pin(&'a str, u32),
}

fn parse_endpoint(path: &str) -> Result<Endpoint<'_>, Box<dyn Error>> {
    if let Some((port, rest)) = path.split_once('[') {
        let index = rest
            .strip_suffix(']')
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| format!("bad pin index in '{path}'"))?;
        return Ok(Endpoint::Pin(port, index));
    }
    match path.matches('.').count() {
        1 => Ok(Endpoint::Interface(path)),
        2 => Ok(Endpoint::Port(path)),
        _ => Err(format!("'{path}' is not an interface, port or pin path").into()),
    }
}

fn connect_endpoints(project: &mut Project, from: &str, to: &str) -> Result<(), Box<dyn Error>> {
    match (parse_endpoint(from)?, parse_endpoint(to)?) {
        (Endpoint::Interface(a), Endpoint::Interface(b)) => {
            let (a, b) = (project.find_interface(a)?, project.find_interface(b)?);
            project.connect_interface(a, b)?;
        }
        (Endpoint::Port(a), Endpoint::Port(b)) => {
            let (a, b) = (project.find_port(a)?, project.find_port(b)?);
            project.connect_port(a, b)?;
        }
        (Endpoint::Pin(a, i), Endpoint::Pin(b, j)) => {
            let a = PinRef::new(project.find_port(a)?, i);
            let b = PinRef::new(project.find_port(b)?, j);
            project.connect(a, b)?;
        }
        _ => {
            return Err(
                format!("cannot connect '{from}' to '{to}': endpoints differ in kind").into(),
            )
        }
    }
    Ok(())
}
