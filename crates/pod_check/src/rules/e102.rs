//! E102: Forced port connected.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::Project;

use crate::helpers::port_location;
use crate::CheckRule;

/// Detects ports tied to a constant that also carry connections.
pub struct ForcedPortConnected;

impl CheckRule for ForcedPortConnected {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 102)
    }

    fn name(&self) -> &str {
        "forced-port-connected"
    }

    fn description(&self) -> &str {
        "port is forced to a constant and also connected"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (id, port) in project.ports() {
            let Some(force) = port.force else {
                continue;
            };
            if !project.graph().port_is_connected(id) {
                continue;
            }
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!(
                        "{} is forced to {force} but has connections",
                        project.port_path(id)
                    ),
                    port_location(project, id),
                )
                .with_help("release the force or disconnect the port"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::{fixtures, Force, PinRef};

    #[test]
    fn forced_and_connected_fires() {
        let mut project = Project::new("soc");
        let a = project.add_instance(&fixtures::gpio("gpio", 2), None).unwrap();
        let b = project.add_instance(&fixtures::gpio("gpio", 2), None).unwrap();
        let dout = project
            .port_named(project.interface_named(a, "pins").unwrap(), "dout")
            .unwrap();
        let din = project
            .port_named(project.interface_named(b, "pins").unwrap(), "din")
            .unwrap();
        project.connect(PinRef::new(dout, 1), PinRef::new(din, 1)).unwrap();
        project.port_mut(din).unwrap().force = Some(Force::Vcc);

        let sink = DiagnosticSink::new();
        ForcedPortConnected.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("gpio01.pins.din"));
    }

    #[test]
    fn forced_unconnected_is_clean() {
        let mut project = Project::new("soc");
        let a = project.add_instance(&fixtures::gpio("gpio", 2), None).unwrap();
        let din = project
            .port_named(project.interface_named(a, "pins").unwrap(), "din")
            .unwrap();
        project.set_force(din, Force::Gnd).unwrap();
        let sink = DiagnosticSink::new();
        ForcedPortConnected.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
