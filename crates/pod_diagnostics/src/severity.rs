//! Severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic. Declaration order gives `Note < Warning < Error`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Informational context, e.g. a slave skipped on an optional path.
    Note,
    /// Reported, does not block generation.
    Warning,
    /// Blocks Intercon generation.
    Error,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
