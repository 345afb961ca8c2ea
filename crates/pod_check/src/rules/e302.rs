//! E302: Unresolved width, a port sized by a generic without a numeric value.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::{Project, Width};

use crate::helpers::port_location;
use crate::CheckRule;

/// Detects ports whose width names a generic that is missing or does not
/// hold an integer.
pub struct UnresolvedWidth;

impl CheckRule for UnresolvedWidth {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 302)
    }

    fn name(&self) -> &str {
        "unresolved-width"
    }

    fn description(&self) -> &str {
        "port width generic does not resolve to an integer"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (id, port) in project.ports() {
            if !matches!(port.width, Width::Generic(_)) {
                continue;
            }
            if let Err(err) = project.port_width(id) {
                sink.emit(Diagnostic::error(
                    self.code(),
                    err.to_string(),
                    port_location(project, id),
                ));
            }
        }
    }
}
