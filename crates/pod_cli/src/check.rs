//! `pod check`: load the project, run every rule, render the findings.

use pod_check::{validate_with, CheckEngine};
use pod_config::{CheckConfig, ProjectConfig};
use pod_diagnostics::{DiagnosticRenderer, Severity, TerminalRenderer};

use crate::{project, CheckArgs, GlobalArgs, ReportFormat};

/// Runs `pod check`. Returns exit code 1 when an error is found.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let loaded = project::load(global)?;
    let config = &loaded.config;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking {}", config.project.name);
    }

    let engine = CheckEngine::new(&merge_check_config(config, args));
    let diagnostics = validate_with(&engine, &loaded.project);

    match args.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &diagnostics {
                eprintln!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        }
    }

    let errors = diagnostics.iter().filter(|d| d.severity.is_error()).count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
    }

    Ok(if errors > 0 { 1 } else { 0 })
}

/// Merges `--allow`/`--deny` with the `[check]` section; the command line
/// wins when both name a rule.
fn merge_check_config(config: &ProjectConfig, args: &CheckArgs) -> CheckConfig {
    let mut deny = config.check.deny.clone();
    let mut allow = config.check.allow.clone();
    for rule in &args.deny {
        allow.retain(|r| r != rule);
        if !deny.contains(rule) {
            deny.push(rule.clone());
        }
    }
    for rule in &args.allow {
        deny.retain(|r| r != rule);
        if !allow.contains(rule) {
            allow.push(rule.clone());
        }
    }
    CheckConfig { deny, allow }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(allow: &[&str], deny: &[&str]) -> CheckArgs {
        CheckArgs {
            allow: allow.iter().map(|s| s.to_string()).collect(),
            deny: deny.iter().map(|s| s.to_string()).collect(),
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn command_line_overrides_file() {
        let config = pod_config::load_config_from_str(
            "[project]\nname = \"soc\"\n[check]\ndeny = [\"W101\"]\nallow = [\"W102\"]\n",
        )
        .unwrap();
        let merged = merge_check_config(&config, &args(&["W101"], &["W102"]));
        assert_eq!(merged.allow, vec!["W101"]);
        assert_eq!(merged.deny, vec!["W102"]);
    }

    #[test]
    fn no_flags_keeps_file() {
        let config = pod_config::load_config_from_str(
            "[project]\nname = \"soc\"\n[check]\ndeny = [\"E202\"]\n",
        )
        .unwrap();
        let merged = merge_check_config(&config, &args(&[], &[]));
        assert_eq!(merged.deny, vec!["E202"]);
        assert!(merged.allow.is_empty());
    }
}
