//! E101: Asymmetric connection, a pin record without its mirror.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::Project;

use crate::helpers::pin_location;
use crate::CheckRule;

/// Detects connection records held by one pin whose far end does not hold
/// the record back.
///
/// The checked mutators never build such a state; seeing one means the
/// netlist was corrupted and its wiring cannot be trusted.
pub struct AsymmetricConnection;

impl CheckRule for AsymmetricConnection {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 101)
    }

    fn name(&self) -> &str {
        "asymmetric-connection"
    }

    fn description(&self) -> &str {
        "connection recorded on only one of its two pins"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (holder, target) in project.graph().asymmetric_records() {
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!(
                        "{} records a connection to {} that is not recorded back",
                        project.pin_path(holder),
                        project.pin_path(target)
                    ),
                    pin_location(project, holder),
                )
                .with_related(pin_location(project, target), "has no record of this pin")
                .with_help("disconnect the pin and connect it again"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::{fixtures, PinRef};

    fn project() -> (Project, PinRef, PinRef) {
        let mut project = Project::new("soc");
        let a = project.add_instance(&fixtures::gpio("gpio", 4), None).unwrap();
        let b = project.add_instance(&fixtures::gpio("gpio", 4), None).unwrap();
        let a_pins = project.interface_named(a, "pins").unwrap();
        let b_pins = project.interface_named(b, "pins").unwrap();
        let dout = project.port_named(a_pins, "dout").unwrap();
        let din = project.port_named(b_pins, "din").unwrap();
        (project, PinRef::new(dout, 0), PinRef::new(din, 0))
    }

    #[test]
    fn one_sided_record_fires() {
        let (mut project, dout, din) = project();
        project.graph_mut().insert_one_sided(dout, din);
        let sink = DiagnosticSink::new();
        AsymmetricConnection.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::new(Category::Error, 101));
        assert_eq!(diags[0].location.to_string(), "gpio00.pins.dout[0]");
    }

    #[test]
    fn symmetric_connection_is_clean() {
        let (mut project, dout, din) = project();
        project.connect(dout, din).unwrap();
        let sink = DiagnosticSink::new();
        AsymmetricConnection.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
