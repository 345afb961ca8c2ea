//! E104: Pin out of range, a connection on a pin beyond the port width.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::{PinRef, Project};

use crate::helpers::pin_location;
use crate::CheckRule;

/// Detects connected pins whose index is not below the port's width.
///
/// Widths given by generics can shrink after wiring; ports whose width does
/// not resolve are left to E302.
pub struct PinOutOfRange;

impl CheckRule for PinOutOfRange {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 104)
    }

    fn name(&self) -> &str {
        "pin-out-of-range"
    }

    fn description(&self) -> &str {
        "connected pin index is beyond the port width"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (id, _port) in project.ports() {
            let Ok(width) = project.port_width(id) else {
                continue;
            };
            for index in project.graph().connected_pins(id).filter(|&i| i >= width) {
                let pin = PinRef::new(id, index);
                sink.emit(
                    Diagnostic::error(
                        self.code(),
                        format!(
                            "{} is connected but {} is only {width} bits wide",
                            project.pin_path(pin),
                            project.port_path(id)
                        ),
                        pin_location(project, pin),
                    )
                    .with_help("widen the port or disconnect the pin"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::fixtures;

    #[test]
    fn shrunk_port_fires() {
        let mut project = Project::new("soc");
        project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let ram = project
            .add_instance(&fixtures::generic_slave("ram", 4), None)
            .unwrap();
        let m_adr = project.find_port("cpu00.mwb.wbm_adr").unwrap();
        let s_adr = project.find_port("ram00.swb.wbs_adr").unwrap();
        project.connect(PinRef::new(m_adr, 3), PinRef::new(s_adr, 3)).unwrap();
        project.set_generic(ram, "ADDR_WIDTH", "2").unwrap();

        let sink = DiagnosticSink::new();
        PinOutOfRange.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].location.to_string(), "ram00.swb.wbs_adr[3]");
    }

    #[test]
    fn pins_in_range_are_clean() {
        let mut project = Project::new("soc");
        project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        project
            .add_instance(&fixtures::generic_slave("ram", 4), None)
            .unwrap();
        let m_adr = project.find_port("cpu00.mwb.wbm_adr").unwrap();
        let s_adr = project.find_port("ram00.swb.wbs_adr").unwrap();
        project.connect(PinRef::new(m_adr, 3), PinRef::new(s_adr, 3)).unwrap();
        let sink = DiagnosticSink::new();
        PinOutOfRange.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
