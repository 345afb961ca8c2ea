//! E103: Variable port gap, connected pins that do not run from 0 upward.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::Project;

use crate::helpers::port_location;
use crate::CheckRule;

/// Detects variable-width ports whose connected pins are not `0, 1, 2, ...`.
///
/// A variable port takes its width from the highest connected pin, so every
/// pin below it must be connected too.
pub struct VariablePortGap;

impl CheckRule for VariablePortGap {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 103)
    }

    fn name(&self) -> &str {
        "variable-port-gap"
    }

    fn description(&self) -> &str {
        "variable port connections must start at pin 0 and be contiguous"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (id, port) in project.ports() {
            if !port.variable {
                continue;
            }
            let pins: Vec<u32> = project.graph().connected_pins(id).collect();
            let Some(&max) = pins.last() else {
                continue;
            };
            if pins.len() as u64 == u64::from(max) + 1 {
                continue;
            }
            let missing: Vec<String> = (0..max)
                .filter(|i| pins.binary_search(i).is_err())
                .map(|i| i.to_string())
                .collect();
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!(
                        "pin connections on {} must be contiguous from 0",
                        project.port_path(id)
                    ),
                    port_location(project, id),
                )
                .with_note(format!("unconnected below pin {max}: {}", missing.join(", "))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::{ComponentDef, Direction, InterfaceClass, InterfaceDef, PinRef, PortDef, PortId};

    fn project() -> (Project, PortId, PortId) {
        let mut project = Project::new("soc");
        let leds = ComponentDef::new("leds").interface(
            InterfaceDef::new("pins", InterfaceClass::Gls)
                .port(PortDef::new("led", Direction::In, 8).variable()),
        );
        let driver = ComponentDef::new("drv").interface(
            InterfaceDef::new("pins", InterfaceClass::Gls)
                .port(PortDef::new("q", Direction::Out, 8)),
        );
        let l = project.add_instance(&leds, None).unwrap();
        let d = project.add_instance(&driver, None).unwrap();
        let led = project
            .port_named(project.interface_named(l, "pins").unwrap(), "led")
            .unwrap();
        let q = project
            .port_named(project.interface_named(d, "pins").unwrap(), "q")
            .unwrap();
        (project, q, led)
    }

    #[test]
    fn gap_fires() {
        let (mut project, q, led) = project();
        project.connect(PinRef::new(q, 0), PinRef::new(led, 0)).unwrap();
        project.connect(PinRef::new(q, 2), PinRef::new(led, 2)).unwrap();
        let sink = DiagnosticSink::new();
        VariablePortGap.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].notes, vec!["unconnected below pin 2: 1".to_string()]);
    }

    #[test]
    fn must_start_at_zero() {
        let (mut project, q, led) = project();
        project.connect(PinRef::new(q, 1), PinRef::new(led, 1)).unwrap();
        let sink = DiagnosticSink::new();
        VariablePortGap.check(&project, &sink);
        assert_eq!(sink.take_all().len(), 1);
    }

    #[test]
    fn contiguous_is_clean() {
        let (mut project, q, led) = project();
        for i in 0..3 {
            project.connect(PinRef::new(q, i), PinRef::new(led, i)).unwrap();
        }
        let sink = DiagnosticSink::new();
        VariablePortGap.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
