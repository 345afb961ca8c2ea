//! E203: Register collision, two registers at one absolute address.

use std::collections::BTreeMap;

use pod_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location, Severity};
use pod_netlist::{InterfaceId, Project};

use crate::helpers::interface_location;
use crate::CheckRule;

/// Detects registers of slaves bound to one master that end up at the same
/// absolute address.
pub struct RegisterCollision;

impl CheckRule for RegisterCollision {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::new(Category::Error, 203)
    }

    fn name(&self) -> &str {
        "register-collision"
    }

    fn description(&self) -> &str {
        "two registers share an absolute address"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, project: &Project, sink: &DiagnosticSink) {
        for master in project.masters() {
            let Ok(slaves) = project.bound_slaves(master) else {
                continue;
            };
            let mut seen: BTreeMap<u64, (InterfaceId, String)> = BTreeMap::new();
            for slave in slaves {
                let (Some(iface), Some(base), Ok(data_size)) = (
                    project.interface(slave),
                    project.base_address(slave),
                    project.data_size(slave),
                ) else {
                    continue;
                };
                for reg in &iface.registers {
                    let address = reg.address(base, data_size);
                    let name = project.name_of(reg.name).to_string();
                    match seen.get(&address) {
                        Some((other, other_name)) => sink.emit(
                            Diagnostic::error(
                                self.code(),
                                format!(
                                    "register conflict at {address:#x} between {}.{name} and {}.{other_name}",
                                    project.interface_path(slave),
                                    project.interface_path(*other)
                                ),
                                register_location(project, slave, &name),
                            )
                            .with_related(
                                register_location(project, *other, other_name),
                                "register already at this address",
                            ),
                        ),
                        None => {
                            seen.insert(address, (slave, name));
                        }
                    }
                }
            }
        }
    }
}

/// Registers are located like ports of their interface.
fn register_location(project: &Project, slave: InterfaceId, register: &str) -> Location {
    let mut location = interface_location(project, slave);
    location.port = Some(register.to_string());
    location
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::fixtures;

    fn system() -> (Project, InterfaceId, InterfaceId) {
        let mut project = Project::new("soc");
        let cpu = project.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let mwb = project.interface_named(cpu, "mwb").unwrap();
        let mut ids = Vec::new();
        for addr in [4, 2] {
            let inst = project
                .add_instance(&fixtures::wb_slave("ip", addr, 32), None)
                .unwrap();
            let swb = project.interface_named(inst, "swb").unwrap();
            project.bind(mwb, swb).unwrap();
            ids.push(swb);
        }
        (project, ids[0], ids[1])
    }

    #[test]
    fn shared_base_collides() {
        let (mut project, _, second) = system();
        project.set_base_address(second, 0x0).unwrap();
        let sink = DiagnosticSink::new();
        RegisterCollision.check(&project, &sink);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 2);
        assert!(diags[0].message.contains("0x0 between ip01.swb.reg0 and ip00.swb.reg0"));
        assert_eq!(diags[1].location.to_string(), "ip01.swb.reg1");
    }

    #[test]
    fn distinct_windows_are_clean() {
        let (project, _, _) = system();
        let sink = DiagnosticSink::new();
        RegisterCollision.check(&project, &sink);
        assert!(sink.take_all().is_empty());
    }
}
