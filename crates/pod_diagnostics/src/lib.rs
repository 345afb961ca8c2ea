//! Validation findings and their rendering.
//!
//! A [`Diagnostic`] carries a severity, a stable code such as `E202`, and a
//! [`Location`] naming the netlist object it concerns (`cpu00.mwb`,
//! `uart00.swb.wbs_adr[3]`). Validation passes push diagnostics into a
//! [`DiagnosticSink`]; the CLI renders them with a [`DiagnosticRenderer`] or
//! serializes them as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use location::{Location, Related};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
