//! E202: Overlapping windows in one master's address space.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use pod_netlist::{InterfaceRef, Project};

use crate::helpers::interface_location;
use crate::CheckRule;

/// Detects pairs of slaves of the same master whose windows share an
/// address. Explicit bases are accepted when set and only reported here.
pub struct OverlappingWindows;

impl CheckRule for OverlappingWindows {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 202)
    }

    fn name(&self) -> &str {
        "overlapping-windows"
    }

    fn description(&self) -> &str {
        "two slave windows of one master overlap"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for master in project.masters() {
            let Some(alloc) = project.interface(master).and_then(|m| m.alloc.as_ref()) else {
                continue;
            };
            for (a, b) in alloc.overlaps() {
                let location = |r: InterfaceRef| match project.resolve_ref(r) {
                    Some(id) => interface_location(project, id),
                    None => Location::PROJECT,
                };
                let span = |r: InterfaceRef| {
                    alloc
                        .window(r)
                        .map(|w| format!("{:#x}..{:#x}", w.base, w.end()))
                        .unwrap_or_default()
                };
                sink.emit(
                    Diagnostic::error(
                        self.code(),
                        format!(
                            "windows of {} ({}) and {} ({}) overlap in {}",
                            project.ref_path(a),
                            span(a),
                            project.ref_path(b),
                            span(b),
                            project.interface_path(master)
                        ),
                        location(a),
                    )
                    .with_related(location(b), "overlapping window")
                    .with_help("move one of the explicit base addresses"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::{fixtures, InterfaceId};

    fn system(slaves: &[u32]) -> (Project, Vec<InterfaceId>) {
        let mut project = Project::new("soc");
        let cpu = project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let mwb = project.interface_named(cpu, "mwb").unwrap();
        let mut ids = Vec::new();
        for &addr in slaves {
            let inst = project
                .add_instance(&fixtures::wb_slave("ip", addr, 32), None)
                .unwrap();
            let swb = project.interface_named(inst, "swb").unwrap();
            project.bind(mwb, swb).unwrap();
            ids.push(swb);
        }
        (project, ids)
    }

    #[test]
    fn explicit_overlap_fires() {
        let (mut project, ids) = system(&[4, 2]);
        // ip00 occupies 0x00..0x40, ip01 forced into the middle of it
        project.set_base_address(ids[1], 0x10).unwrap();
        let sink = DiagnosticSink::new();
        OverlappingWindows.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].location.to_string(), "ip00.swb");
        assert_eq!(diags[0].related[0].location.to_string(), "ip01.swb");
        assert!(diags[0].message.contains("0x0..0x40"));
    }

    #[test]
    fn allocated_windows_do_not_overlap() {
        let (project, _) = system(&[4, 2, 3]);
        let sink = DiagnosticSink::new();
        OverlappingWindows.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
