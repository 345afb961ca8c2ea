//! E301: Missing bus role, a bus interface without a port its protocol
//! requires.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::Project;

use crate::helpers::interface_location;
use crate::CheckRule;

/// Detects master and slave interfaces that lack a port for one of the
/// roles their protocol requires on that side.
pub struct MissingBusRole;

impl CheckRule for MissingBusRole {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 301)
    }

    fn name(&self) -> &str {
        "missing-bus-role"
    }

    fn description(&self) -> &str {
        "bus interface has no port for a required role"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (id, iface) in project.interfaces() {
            let (Some(class), Some(bus)) = (iface.class.bus_class(), iface.bus.as_ref()) else {
                continue;
            };
            for role in bus.protocol().required_roles(class) {
                let diag = match bus.resolve(class, role) {
                    Err(err) => Diagnostic::error(
                        self.code(),
                        format!("{}: {err}", project.interface_path(id)),
                        interface_location(project, id),
                    ),
                    Ok(ty) if project.role_port(id, role).is_none() => Diagnostic::error(
                        self.code(),
                        format!(
                            "{} has no port for the {} {role} role",
                            project.interface_path(id),
                            bus.name()
                        ),
                        interface_location(project, id),
                    )
                    .with_help(format!("add a port of type {ty}")),
                    Ok(_) => continue,
                };
                sink.emit(diag);
            }
        }
    }
}
