//! W102: Empty master, a bus master with no slave bound.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::Project;

use crate::helpers::interface_location;
use crate::CheckRule;

/// Detects masters without slaves. Their Intercon would drive nothing.
pub struct EmptyMaster;

impl CheckRule for EmptyMaster {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Warning, 102)
    }

    fn name(&self) -> &str {
        "empty-master"
    }

    fn description(&self) -> &str {
        "master interface has no slave bound"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for master in project.masters() {
            if project.bound_slaves(master).is_ok_and(|s| s.is_empty()) {
                sink.emit(Diagnostic::warning(
                    self.code(),
                    format!("{} has no slave", project.interface_path(master)),
                    interface_location(project, master),
                ));
            }
        }
    }
}
