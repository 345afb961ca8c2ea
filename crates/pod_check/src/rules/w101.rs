//! W101: Unbound slave, a bus slave not attached to any master.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::{InterfaceClass, Project};

use crate::helpers::interface_location;
use crate::CheckRule;

/// Detects slave interfaces that are not bound to a master. They get no
/// window and are left out of every Intercon.
pub struct UnboundSlave;

impl CheckRule for UnboundSlave {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 101)
    }

    fn name(&self) -> &str {
        "unbound-slave"
    }

    fn description(&self) -> &str {
        "slave interface is not connected to a master bus"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (id, iface) in project.interfaces() {
            if iface.class != InterfaceClass::Slave || project.master_of(id).is_some() {
                continue;
            }
            let mut diag = Diagnostic::warning(
                self.code(),
                format!("{} is not connected on a master bus", project.interface_path(id)),
                interface_location(project, id),
            );
            if let Some(bus) = iface.bus_name() {
                diag = diag.with_help(format!("bind it to a {bus} master"));
            }
            sink.emit(diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::fixtures;

    #[test]
    fn unbound_slave_fires() {
        let mut project = Project::new("soc");
        project.add_instance(&fixtures::wb_slave("led", 2, 8), None).unwrap();
        let sink = DiagnosticSink::new();
        UnboundSlave.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].help, vec!["bind it to a wishbone master".to_string()]);
    }

    #[test]
    fn bound_slave_is_clean() {
        let mut project = Project::new("soc");
        let cpu = project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let led = project.add_instance(&fixtures::wb_slave("led", 2, 8), None).unwrap();
        let m = project.interface_named(cpu, "mwb").unwrap();
        let s = project.interface_named(led, "swb").unwrap();
        project.bind(m, s).unwrap();
        let sink = DiagnosticSink::new();
        UnboundSlave.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
