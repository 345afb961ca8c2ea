//! Content hashing of generated artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 digest of a generated text.
///
/// Intercon artifacts are hashed when they are produced so that a rewrite of
/// an identical file can be detected and reported as unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hashes a byte slice with XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data).to_le_bytes())
    }

    /// Hashes UTF-8 text.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// First six bytes in hex, for status lines.
    pub fn short(&self) -> String {
        self.0[..6].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_same_hash() {
        let a = ContentHash::from_text("entity foo is end entity;");
        let b = ContentHash::from_bytes(b"entity foo is end entity;");
        assert_eq!(a, b);
    }

    #[test]
    fn one_char_changes_hash() {
        let a = ContentHash::from_text("cs <= '0';");
        let b = ContentHash::from_text("cs <= '1';");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_hex() {
        let s = ContentHash::from_text("x").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_is_a_prefix() {
        let h = ContentHash::from_text("intercon");
        assert_eq!(h.short().len(), 12);
        assert!(h.to_string().starts_with(&h.short()));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_text("serde");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
