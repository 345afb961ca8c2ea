//! The component definition of a planned Intercon.

use pod_netlist::{ComponentDef, InterfaceClass, InterfaceDef, PortDef};

use crate::context::InterconContext;

/// Builds the Intercon component: one `intercon` interface per bridged
/// interface, slaves first, each holding the mirror of every port.
pub fn component_def(ctx: &InterconContext) -> ComponentDef {
    let mut def = ComponentDef::new(&ctx.component);
    for endpoint in ctx.endpoints() {
        let mut iface = InterfaceDef::new(endpoint.mirror_name(), InterfaceClass::Intercon);
        for mp in &endpoint.ports {
            let mut port = PortDef::new(&mp.name, mp.direction, mp.width);
            if let Some(ty) = &mp.port_type {
                port = port.typed(ty);
            }
            iface = iface.port(port);
        }
        def = def.interface(iface);
    }
    def
}
