//! Rendering of diagnostics for the terminal.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Formats a diagnostic into text.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// rustc-style terminal output:
///
/// ```text
/// error[E202]: window of led00.swb overlaps uart00.swb
///   --> cpu00.mwb
///    |-- uart00.swb: overlaps this window
///    = note: both windows cover 0x04..0x08
/// ```
pub struct TerminalRenderer {
    /// Whether to emit ANSI colors.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{code}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();
        let head = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity, &head),
            diag.message
        ));

        if !diag.location.is_project() {
            out.push_str(&format!("  --> {}\n", diag.location));
        }
        for related in &diag.related {
            out.push_str(&format!("   |-- {}: {}\n", related.location, related.message));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}
