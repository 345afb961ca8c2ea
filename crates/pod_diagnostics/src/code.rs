//! Diagnostic codes with a category prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a diagnostic code, which picks its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Findings that block Intercon generation, prefixed with `E`.
    Error,
    /// Findings that are reported but do not block generation, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the prefix letter for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A category prefix plus a number, displayed as e.g. `E202` or `W101`.
///
/// The hundreds digit groups related checks: 1xx wiring, 2xx address space,
/// 3xx bus description.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Category of this code.
    pub category: Category,
    /// Number within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(DiagnosticCode::new(Category::Error, 202).to_string(), "E202");
        assert_eq!(DiagnosticCode::new(Category::Warning, 7).to_string(), "W007");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Warning, 101);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
