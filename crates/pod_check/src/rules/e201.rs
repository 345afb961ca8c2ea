//! E201: Misaligned window, a base address that is not a multiple of the
//! window size.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::{InterfaceClass, Project};

use crate::helpers::interface_location;
use crate::CheckRule;

/// Detects slave windows whose base is not aligned on their size.
///
/// Covers both allocated windows and explicit bases of slaves not yet
/// bound, whose size may have changed through a generic since the base was
/// set.
pub struct MisalignedWindow;

impl CheckRule for MisalignedWindow {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 201)
    }

    fn name(&self) -> &str {
        "misaligned-window"
    }

    fn description(&self) -> &str {
        "slave base address is not a multiple of its window size"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for (id, iface) in project.interfaces() {
            if iface.class != InterfaceClass::Slave {
                continue;
            }
            let Some(base) = project.base_address(id).or(iface.explicit_base) else {
                continue;
            };
            let (Ok(size), Ok(true)) = (project.mem_size(id), project.is_addressed(id)) else {
                continue;
            };
            if size != 0 && base % size == 0 {
                continue;
            }
            sink.emit(
                Diagnostic::error(
                    self.code(),
                    format!(
                        "{} is based at {base:#x}, not a multiple of its size {size:#x}",
                        project.interface_path(id)
                    ),
                    interface_location(project, id),
                )
                .with_help(format!(
                    "use a base address such as {:#x}",
                    base.div_ceil(size.max(1)) * size
                )),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::fixtures;

    #[test]
    fn grown_window_fires() {
        let mut project = Project::new("soc");
        let ram = project
            .add_instance(&fixtures::generic_slave("ram", 2), None)
            .unwrap();
        let swb = project.find_interface("ram00.swb").unwrap();
        project.set_base_address(swb, 0x10).unwrap();
        project.set_generic(ram, "ADDR_WIDTH", "4").unwrap();

        let sink = DiagnosticSink::new();
        MisalignedWindow.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("0x10"));
        assert_eq!(diags[0].help, vec!["use a base address such as 0x40".to_string()]);
    }

    #[test]
    fn allocated_windows_are_aligned() {
        let mut project = Project::new("soc");
        let cpu = project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let mwb = project.interface_named(cpu, "mwb").unwrap();
        for (addr, data) in [(1, 8), (4, 32), (2, 16)] {
            let inst = project
                .add_instance(&fixtures::wb_slave("ip", addr, data), None)
                .unwrap();
            let swb = project.interface_named(inst, "swb").unwrap();
            project.bind(mwb, swb).unwrap();
        }
        let sink = DiagnosticSink::new();
        MisalignedWindow.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn clock_bindings_have_no_window_to_align() {
        let mut project = Project::new("soc");
        let clk = project
            .add_instance(&fixtures::candr_master("osc"), None)
            .unwrap();
        let uart = project
            .add_instance(&fixtures::candr_slave("uart"), None)
            .unwrap();
        let master = project.interface_named(clk, "candr").unwrap();
        let slave = project.interface_named(uart, "candr").unwrap();
        project.bind(master, slave).unwrap();

        let sink = DiagnosticSink::new();
        MisalignedWindow.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
