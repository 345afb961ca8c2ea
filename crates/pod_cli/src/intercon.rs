//! `pod intercon`: synthesize Intercons and write their VHDL under the
//! components directory.

use std::error::Error;

use pod_intercon::{
    synthesize_all, synthesize_intercon, write_artifact, Artifact, ArtifactStatus, GeneratedText,
    InterconError,
};

use crate::project::{self, Loaded};
use crate::{GlobalArgs, InterconArgs};

/// Runs `pod intercon`. Returns exit code 1 when any master failed.
pub fn run(args: &InterconArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let mut loaded = project::load(global)?;
    let results = synthesize(&mut loaded, args)?;

    let mut failed = 0;
    for (master, result) in &results {
        match result {
            Ok(text) => {
                let artifact = if args.dry_run {
                    None
                } else {
                    Some(write_artifact(&loaded.paths.components, text)?)
                };
                if !global.quiet {
                    eprintln!("{}", summary_line(master, text, artifact.as_ref()));
                    for note in &text.notes {
                        eprintln!("      note: {note}");
                    }
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("error: {master}: {err}");
                if let InterconError::Blocked { diagnostics, .. } = err {
                    for diag in diagnostics {
                        eprintln!("      {}: {}", diag.code, diag.message);
                    }
                }
            }
        }
    }

    if !global.quiet && results.len() > 1 {
        eprintln!(
            "   Result: {} generated, {failed} failed",
            results.len() - failed
        );
    }
    Ok(if failed > 0 { 1 } else { 0 })
}

type Outcome = (String, Result<GeneratedText, InterconError>);

fn synthesize(loaded: &mut Loaded, args: &InterconArgs) -> Result<Vec<Outcome>, Box<dyn Error>> {
    let project = &mut loaded.project;
    if args.all {
        return Ok(synthesize_all(project)
            .into_iter()
            .map(|(master, result)| (project.interface_path(master), result))
            .collect());
    }
    let path = args.master.as_deref().ok_or("no master interface given")?;
    let master = project.find_interface(path)?;
    Ok(vec![(path.to_string(), synthesize_intercon(project, master))])
}

fn summary_line(master: &str, text: &GeneratedText, artifact: Option<&Artifact>) -> String {
    let short = text.content_hash.short();
    let (verb, file) = match artifact {
        None => ("Generated", format!("{}.vhd", text.instance)),
        Some(a) => (
            match a.status {
                ArtifactStatus::Written => "Wrote",
                ArtifactStatus::Unchanged => "Unchanged",
            },
            a.path.display().to_string(),
        ),
    };
    format!("   {verb:>9} {master} ({}, {short}): {file}", text.protocol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::tests::{global, write_project, SOC};

    const VHD: &str = "components/cpu_mwb_intercon/hdl/cpu_mwb_intercon.vhd";

    fn args(master: Option<&str>, all: bool, dry_run: bool) -> InterconArgs {
        InterconArgs {
            master: master.map(str::to_string),
            all,
            dry_run,
        }
    }

    #[test]
    fn writes_the_intercon_under_components() {
        let tmp = write_project(SOC);
        let code = run(&args(Some("cpu.mwb"), false, false), &global(tmp.path())).unwrap();
        assert_eq!(code, 0);
        let text = std::fs::read_to_string(tmp.path().join(VHD)).unwrap();
        assert!(text.contains("Entity cpu_mwb is\n"));
    }

    #[test]
    fn summary_names_status_and_path() {
        let tmp = write_project(SOC);
        let mut loaded = project::load(&global(tmp.path())).unwrap();
        let results = synthesize(&mut loaded, &args(Some("cpu.mwb"), false, false)).unwrap();
        let text = results[0].1.as_ref().unwrap();
        assert!(summary_line("cpu.mwb", text, None).ends_with(": cpu_mwb_intercon.vhd"));
        let artifact = write_artifact(&loaded.paths.components, text).unwrap();
        let line = summary_line("cpu.mwb", text, Some(&artifact));
        assert!(line.trim_start().starts_with("Wrote cpu.mwb (wishbone, "));
        assert!(line.ends_with("cpu_mwb_intercon.vhd"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = write_project(SOC);
        let code = run(&args(None, true, true), &global(tmp.path())).unwrap();
        assert_eq!(code, 0);
        assert!(!tmp.path().join("components").exists());
    }

    #[test]
    fn second_run_leaves_the_file_unchanged() {
        let tmp = write_project(SOC);
        let g = global(tmp.path());
        run(&args(Some("cpu.mwb"), false, false), &g).unwrap();
        let mut loaded = project::load(&g).unwrap();
        let results = synthesize(&mut loaded, &args(Some("cpu.mwb"), false, false)).unwrap();
        let (_, result) = &results[0];
        let text = result.as_ref().unwrap();
        let artifact = write_artifact(&loaded.paths.components, text).unwrap();
        assert_eq!(artifact.status, ArtifactStatus::Unchanged);
    }

    #[test]
    fn unknown_master_is_an_error() {
        let tmp = write_project(SOC);
        assert!(run(&args(Some("cpu.nope"), false, false), &global(tmp.path())).is_err());
    }
}
