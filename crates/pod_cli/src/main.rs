//! pod CLI: checks, address maps and Intercon generation for `pod.toml`
//! projects.
//!
//! `pod check` validates the assembled netlist, `pod map` and `pod report`
//! print a master's memory and register maps, and `pod intercon` generates
//! the VHDL bridging a master to its slaves.

#![warn(missing_docs)]

mod check;
mod intercon;
mod map;
mod project;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// pod: IP-core assembly for FPGA designs.
#[derive(Parser, Debug)]
#[command(name = "pod", version, about = "pod IP-core assembler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `pod.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the project.
    Check(CheckArgs),
    /// Print the memory map of bus masters.
    Map(MapArgs),
    /// Print the register map of bus masters.
    Report(MapArgs),
    /// Generate Intercons.
    Intercon(InterconArgs),
}

/// Arguments for `pod check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Rule names or codes to suppress (e.g., `--allow unbound-slave`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Rule names or codes to promote to errors (e.g., `--deny W101`).
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `pod map` and `pod report`.
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Master interface, `instance.interface`. Every master when omitted.
    pub master: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `pod intercon`.
#[derive(Parser, Debug)]
pub struct InterconArgs {
    /// Master interface, `instance.interface`.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub master: Option<String>,

    /// Generate the Intercon of every bus master.
    #[arg(long)]
    pub all: bool,

    /// Generate without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format of reports and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to the project file or its directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Map(ref args) => map::run_map(args, &global),
        Command::Report(ref args) => map::run_report(args, &global),
        Command::Intercon(ref args) => intercon::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the logger; `RUST_LOG` overrides the level the flags select.
fn init_logging(global: &GlobalArgs) {
    let level = if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .write_style(if global.color {
            env_logger::WriteStyle::Always
        } else {
            env_logger::WriteStyle::Never
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check_default() {
        let cli = Cli::parse_from(["pod", "check"]);
        match cli.command {
            Command::Check(ref args) => {
                assert!(args.allow.is_empty());
                assert!(args.deny.is_empty());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_check_with_args() {
        let cli = Cli::parse_from([
            "pod",
            "check",
            "--allow",
            "unbound-slave",
            "--deny",
            "W102",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.allow, vec!["unbound-slave"]);
                assert_eq!(args.deny, vec!["W102"]);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["pod", "--quiet", "--color", "never", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["pod", "--config", "/work/soc/pod.toml", "map"]);
        assert_eq!(cli.config.as_deref(), Some("/work/soc/pod.toml"));
    }

    #[test]
    fn parse_map_master() {
        let cli = Cli::parse_from(["pod", "map", "cpu.mwb", "--format", "json"]);
        match cli.command {
            Command::Map(ref args) => {
                assert_eq!(args.master.as_deref(), Some("cpu.mwb"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_intercon_master() {
        let cli = Cli::parse_from(["pod", "intercon", "cpu.mwb", "--dry-run"]);
        match cli.command {
            Command::Intercon(ref args) => {
                assert_eq!(args.master.as_deref(), Some("cpu.mwb"));
                assert!(!args.all);
                assert!(args.dry_run);
            }
            _ => panic!("expected Intercon command"),
        }
    }

    #[test]
    fn intercon_needs_master_or_all() {
        assert!(Cli::try_parse_from(["pod", "intercon"]).is_err());
        assert!(Cli::try_parse_from(["pod", "intercon", "cpu.mwb", "--all"]).is_err());
        let cli = Cli::parse_from(["pod", "intercon", "--all"]);
        match cli.command {
            Command::Intercon(ref args) => assert!(args.all && args.master.is_none()),
            _ => panic!("expected Intercon command"),
        }
    }
}
