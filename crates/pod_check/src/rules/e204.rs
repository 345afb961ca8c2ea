//! E204: Window out of range, a slave window the master's address lines
//! cannot reach.

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::{InterfaceId, Project};

use crate::helpers::interface_location;
use crate::CheckRule;

/// Detects bound slaves whose window ends past the master's address space.
///
/// A master with an `n`-bit address reaches the byte addresses
/// `0..2^n`. A window beyond that would be decoded on truncated address
/// bits and alias another slave.
pub struct WindowOutOfRange;

/// Bytes reachable through the address of `master`, `None` when the
/// address space covers every 64-bit address.
fn address_space(project: &Project, master: InterfaceId) -> Option<Option<u64>> {
    let addr = project.addr_size(master).ok()?;
    if addr == 0 {
        return None;
    }
    Some(1u64.checked_shl(addr))
}

impl CheckRule for WindowOutOfRange {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 204)
    }

    fn name(&self) -> &str {
        "window-out-of-range"
    }

    fn description(&self) -> &str {
        "slave window lies outside the master's address space"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for master in project.masters() {
            let Some(space) = address_space(project, master) else {
                continue;
            };
            let Ok(slaves) = project.bound_slaves(master) else {
                continue;
            };
            for slave in slaves {
                let (Some(base), Ok(size)) = (project.base_address(slave), project.mem_size(slave))
                else {
                    continue;
                };
                if size == 0 {
                    continue;
                }
                let fits = match (base.checked_add(size), space) {
                    (Some(end), Some(space)) => end <= space,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if fits {
                    continue;
                }
                let limit = match space {
                    Some(space) => format!("{space:#x}"),
                    None => "2^64".to_string(),
                };
                sink.emit(
                    Diagnostic::error(
                        self.code(),
                        format!(
                            "window of {} at {base:#x} with size {size:#x} ends past {limit}, the address space of {}",
                            project.interface_path(slave),
                            project.interface_path(master)
                        ),
                        interface_location(project, slave),
                    )
                    .with_help(format!(
                        "widen the address of {} or shrink the slave windows",
                        project.interface_path(master)
                    )),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::fixtures;

    fn system(slaves: &[(u32, u32)]) -> (Project, Vec<InterfaceId>) {
        let mut project = Project::new("soc");
        let cpu = project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let mwb = project.interface_named(cpu, "mwb").unwrap();
        let mut ids = Vec::new();
        for &(addr, data) in slaves {
            let inst = project
                .add_instance(&fixtures::wb_slave("ip", addr, data), None)
                .unwrap();
            let swb = project.interface_named(inst, "swb").unwrap();
            project.bind(mwb, swb).unwrap();
            ids.push(swb);
        }
        (project, ids)
    }

    #[test]
    fn second_64k_window_on_a_16_bit_master_fires() {
        let (project, ids) = system(&[(14, 32), (14, 32)]);
        assert_eq!(project.base_address(ids[1]), Some(0x10000));

        let sink = DiagnosticSink::new();
        WindowOutOfRange.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "E204");
        assert!(diags[0].message.contains("ip01.swb at 0x10000"));
        assert!(diags[0].message.contains("ends past 0x10000"));
    }

    #[test]
    fn explicit_base_above_the_space_fires() {
        let (mut project, ids) = system(&[(1, 16)]);
        project.set_base_address(ids[0], 0x2_0000).unwrap();

        let sink = DiagnosticSink::new();
        WindowOutOfRange.check(&project, &sink);
        assert_eq!(sink.take_all().len(), 1);
    }

    #[test]
    fn full_but_fitting_space_is_clean() {
        let (project, _) = system(&[(13, 32), (13, 32)]);
        let sink = DiagnosticSink::new();
        WindowOutOfRange.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
