//! Validation rules and engine for assembled projects.
//!
//! Every rule inspects a whole [`Project`] and reports what it finds as
//! [`Diagnostic`]s; nothing stops at the first problem. Errors block Intercon
//! generation, warnings do not.
//!
//! # Rule Categories
//!
//! - **E1xx:** wiring (one-sided records, forced or partially connected ports)
//! - **E2xx:** address space (alignment, overlaps, register collisions,
//!   windows out of the master's reach)
//! - **E3xx:** bus description (missing roles, unresolved widths)
//! - **W1xx:** bindings worth a look (unbound slaves, empty masters)

#![warn(missing_docs)]

mod engine;
mod helpers;
mod rules;

pub use engine::CheckEngine;
pub use helpers::{interface_location, pin_location, port_location};
pub use rules::register_builtin_rules;
pub use rules::{
    AsymmetricConnection, EmptyMaster, ForcedPortConnected, MisalignedWindow, MissingBusRole,
    OverlappingWindows, PinOutOfRange, RegisterCollision, UnboundSlave, UnresolvedWidth,
    VariablePortGap, WindowOutOfRange,
};

use pod_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use pod_netlist::Project;

/// A single validation rule.
///
/// Each rule has a unique diagnostic code, a kebab-case name, a description
/// and a default severity. `check` is called once per run with the whole
/// project and emits into the provided sink.
pub trait CheckRule: Send + Sync {
    /// Returns the diagnostic code for this rule (e.g., E202, W101).
    fn code(&self) -> DiagnosticCode;

    /// Returns the short kebab-case name of this rule (e.g., "overlapping-windows").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule checks.
    fn description(&self) -> &str;

    /// Returns the default severity for diagnostics emitted by this rule.
    fn default_severity(&self) -> Severity;

    /// Checks the project and emits diagnostics to the sink.
    fn check(&self, project: &Project, sink: &DiagnosticSink);
}

/// Runs every built-in rule with default settings and returns all findings.
pub fn validate(project: &Project) -> Vec<Diagnostic> {
    validate_with(&CheckEngine::with_defaults(), project)
}

/// Runs `engine` over `project` and returns all findings.
pub fn validate_with(engine: &CheckEngine, project: &Project) -> Vec<Diagnostic> {
    let sink = DiagnosticSink::new();
    engine.run(project, &sink);
    sink.take_all()
}
