//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use crate::location::{Location, Related};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// One validation finding.
///
/// Built with [`Diagnostic::error`] or [`Diagnostic::warning`] and refined
/// with the `with_*` methods.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of this finding.
    pub severity: Severity,
    /// Stable code identifying the check that produced it.
    pub code: DiagnosticCode,
    /// Main message.
    pub message: String,
    /// Object the finding is about.
    pub location: Location,
    /// Other objects involved, e.g. the second of two overlapping windows.
    pub related: Vec<Related>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: String, location: Location) -> Self {
        Self {
            severity,
            code,
            message,
            location,
            related: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Error, code, message.into(), location)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Warning, code, message.into(), location)
    }

    /// Creates a note.
    pub fn note(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Note, code, message.into(), location)
    }

    /// Attaches a related location.
    pub fn with_related(mut self, location: Location, message: impl Into<String>) -> Self {
        self.related.push(Related::new(location, message));
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}
