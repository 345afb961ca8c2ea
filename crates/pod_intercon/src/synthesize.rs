//! Intercon synthesis: validate, plan, generate, then commit the generated
//! instance into the project.
//!
//! Nothing in the project changes until generation has succeeded. The
//! commit removes the Intercon being replaced, places the new one and wires
//! each mirror port to the port it mirrors.

use pod_check::{validate_with, CheckEngine};
use pod_common::{InternalError, PodResult};
use pod_netlist::{HdlFile, InstanceId, InterfaceId, PortId, Project};

use crate::context::InterconContext;
use crate::error::InterconError;
use crate::generators::{generator_for, GeneratedText};
use crate::mirror;

/// Synthesizes the Intercon of `master` with the default rule set.
pub fn synthesize_intercon(
    project: &mut Project,
    master: InterfaceId,
) -> Result<GeneratedText, InterconError> {
    synthesize_intercon_with(project, master, &CheckEngine::with_defaults())
}

/// Synthesizes the Intercon of `master`, validating with `engine` first.
///
/// Error findings block synthesis; warnings do not. On success the project
/// holds exactly one Intercon instance for `master`, wired to the master
/// and every bound slave.
pub fn synthesize_intercon_with(
    project: &mut Project,
    master: InterfaceId,
    engine: &CheckEngine,
) -> Result<GeneratedText, InterconError> {
    let errors: Vec<_> = validate_with(engine, project)
        .into_iter()
        .filter(|d| d.severity.is_error())
        .collect();
    if !errors.is_empty() {
        return Err(InterconError::Blocked {
            master: project.interface_path(master),
            diagnostics: errors,
        });
    }

    let ctx = InterconContext::plan(project, master)?;
    let text = generator_for(ctx.protocol).generate(&ctx)?;
    commit(project, &ctx)?;
    Ok(text)
}

/// Synthesizes the Intercon of every bus master, one result per master.
///
/// A failure on one master leaves the others unaffected.
pub fn synthesize_all(
    project: &mut Project,
) -> Vec<(InterfaceId, Result<GeneratedText, InterconError>)> {
    let engine = CheckEngine::with_defaults();
    project
        .masters()
        .into_iter()
        .map(|master| {
            let result = synthesize_intercon_with(project, master, &engine);
            if let Err(err) = &result {
                log::warn!("{err}");
            }
            (master, result)
        })
        .collect()
}

fn commit(project: &mut Project, ctx: &InterconContext) -> Result<InstanceId, InterconError> {
    if let Some(old) = ctx.replaces {
        log::debug!("replacing intercon {}", ctx.instance);
        project.remove_instance(old)?;
    }
    let id = project.add_generated_instance(&mirror::component_def(ctx), &ctx.instance)?;
    if let Err(err) = wire(project, ctx, id) {
        project
            .remove_instance(id)
            .map_err(|cleanup| InternalError::new(format!("{err}; cleanup failed: {cleanup}")))?;
        return Err(err);
    }
    project.add_hdl_file(
        id,
        HdlFile {
            path: format!("{}.vhd", ctx.instance),
            top: true,
        },
    )?;
    log::info!("committed intercon {}", ctx.instance);
    Ok(id)
}

/// Connects every mirror port to its original, the driving side as source.
fn wire(project: &mut Project, ctx: &InterconContext, id: InstanceId) -> Result<(), InterconError> {
    for endpoint in ctx.endpoints() {
        let iface = mirror_interface(project, ctx, id, &endpoint.mirror_name())?;
        for mp in &endpoint.ports {
            let mirror = mirror_port(project, ctx, iface, &mp.name)?;
            if mp.direction == pod_netlist::Direction::Out {
                project.connect_port(mirror, mp.port)?;
            } else {
                project.connect_port(mp.port, mirror)?;
            }
        }
    }
    Ok(())
}

fn mirror_interface(
    project: &Project,
    ctx: &InterconContext,
    id: InstanceId,
    name: &str,
) -> PodResult<InterfaceId> {
    project
        .interface_named(id, name)
        .ok_or_else(|| InternalError::new(format!("{} has no interface {name}", ctx.instance)))
}

fn mirror_port(
    project: &Project,
    ctx: &InterconContext,
    iface: InterfaceId,
    name: &str,
) -> PodResult<PortId> {
    project
        .port_named(iface, name)
        .ok_or_else(|| InternalError::new(format!("{} has no port {name}", ctx.instance)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_netlist::fixtures;

    fn system() -> (Project, InterfaceId) {
        let mut p = Project::new("demo");
        let cpu = p.add_instance(&fixtures::wb_master("cpu"), None).unwrap();
        let ram = p.add_instance(&fixtures::wb_slave("ram", 4, 32), None).unwrap();
        let m = p.interface_named(cpu, "mwb").unwrap();
        let s = p.interface_named(ram, "swb").unwrap();
        p.bind(m, s).unwrap();
        (p, m)
    }

    #[test]
    fn commit_wires_every_port() {
        let (mut p, m) = system();
        synthesize_intercon(&mut p, m).unwrap();
        let id = p.instance_named("cpu00_mwb_intercon").unwrap();
        let inst = p.instance(id).unwrap();
        assert!(inst.generated);
        assert_eq!(inst.hdl_files.len(), 1);
        assert_eq!(inst.hdl_files[0].path, "cpu00_mwb_intercon.vhd");

        let stb = p.find_port("cpu00.mwb.wbm_stb").unwrap();
        let mirror = p.find_port("cpu00_mwb_intercon.cpu00_mwb.cpu00_wbm_stb").unwrap();
        assert!(p.graph().port_is_connected(stb));
        assert!(p.graph().port_is_connected(mirror));
        let ack = p.find_port("ram00.swb.wbs_ack").unwrap();
        assert!(p.graph().port_is_connected(ack));
    }

    #[test]
    fn synthesize_all_reports_each_master() {
        let (mut p, m) = system();
        let results = synthesize_all(&mut p);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, m);
        assert!(results[0].1.is_ok());
    }
}
