//! Shared helpers for building diagnostic locations from netlist ids.

use pod_diagnostics::Location;
use pod_netlist::{InterfaceId, PinRef, PortId, Project};

/// Location of an interface, or the project if the id is stale.
pub fn interface_location(project: &Project, id: InterfaceId) -> Location {
    match project.interface(id) {
        Some(iface) => Location::interface(
            project.instance_path(iface.instance),
            project.name_of(iface.name),
        ),
        None => Location::PROJECT,
    }
}

/// Location of a port, or the project if the id is stale.
pub fn port_location(project: &Project, id: PortId) -> Location {
    let Some(port) = project.port(id) else {
        return Location::PROJECT;
    };
    let Some(iface) = project.interface(port.interface) else {
        return Location::PROJECT;
    };
    Location::port(
        project.instance_path(iface.instance),
        project.name_of(iface.name),
        project.name_of(port.name),
    )
}

/// Location of a single pin.
pub fn pin_location(project: &Project, pin: PinRef) -> Location {
    let location = port_location(project, pin.port);
    if location.is_project() {
        location
    } else {
        location.with_pin(pin.index)
    }
}
