//! Indentation-aware VHDL text builder.

/// One level of indentation.
pub const TAB: &str = "    ";

/// Builds VHDL source line by line.
///
/// Lines are indented by the current level; multi-branch assignments wrap
/// their continuation lines one level deeper.
#[derive(Debug, Default)]
pub struct VhdlWriter {
    out: String,
    indent: usize,
}

impl VhdlWriter {
    /// Creates an empty writer at indentation level 0.
    pub fn new() -> Self {
        Self::default()
    }

    fn pad(&mut self, extra: usize) {
        for _ in 0..self.indent + extra {
            self.out.push_str(TAB);
        }
    }

    /// Writes one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.pad(0);
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    /// Writes an empty line.
    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Appends text verbatim.
    pub fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Increases the indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decreases the indentation level.
    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Writes a `-- text` comment line.
    pub fn comment(&mut self, text: impl AsRef<str>) {
        self.line(format!("-- {}", text.as_ref()));
    }

    /// Writes a section title framed by dashes.
    pub fn banner(&mut self, title: &str) {
        let rule = "-".repeat(title.len() + 6);
        self.line(&rule);
        self.line(format!("-- {title} --"));
        self.line(&rule);
    }

    /// Writes `signal <name> : <ty>;`.
    pub fn signal(&mut self, name: &str, ty: &str) {
        self.line(format!("signal {name:<20} : {ty};"));
    }

    /// Writes `target <= value;`.
    pub fn assign(&mut self, target: &str, value: impl AsRef<str>) {
        self.line(format!("{target} <= {};", value.as_ref()));
    }

    /// Writes a conditional assignment:
    /// `target <= v0 when c0 else v1 when c1 else default;`, one branch per
    /// line.
    pub fn select(&mut self, target: &str, branches: &[(String, String)], default: &str) {
        self.pad(0);
        self.out.push_str(target);
        self.out.push_str(" <= ");
        for (value, condition) in branches {
            self.out.push_str(value);
            self.out.push_str(" when ");
            self.out.push_str(condition);
            self.out.push_str(" else\n");
            self.pad(1);
        }
        self.out.push_str(default);
        self.out.push_str(";\n");
    }

    /// Writes `target <= t0 or t1 ...;`, one term per line, or `'0'` without
    /// terms.
    pub fn or_reduce(&mut self, target: &str, terms: &[String]) {
        self.pad(0);
        self.out.push_str(target);
        self.out.push_str(" <= ");
        if terms.is_empty() {
            self.out.push_str("'0'");
        }
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                self.out.push_str(" or\n");
                self.pad(1);
            }
            self.out.push_str(term);
        }
        self.out.push_str(";\n");
    }

    /// Consumes the writer and returns its text.
    pub fn finish(self) -> String {
        self.out
    }
}

/// VHDL type of a port or signal `width` bits wide.
pub fn logic_type(width: u32) -> String {
    if width == 1 {
        "std_logic".to_string()
    } else {
        format!("std_logic_vector({} downto 0)", width.saturating_sub(1))
    }
}

/// `name(hi downto lo)`.
pub fn slice(name: &str, hi: u32, lo: u32) -> String {
    format!("{name}({hi} downto {lo})")
}

/// `value` in binary, `bits` digits wide, keeping the low bits.
pub fn binary(value: u64, bits: u32) -> String {
    let text = format!("{value:064b}");
    match bits as usize {
        n if n <= 64 => text[64 - n..].to_string(),
        n => format!("{}{text}", "0".repeat(n - 64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_follow_indentation() {
        let mut w = VhdlWriter::new();
        w.line("begin");
        w.indent();
        w.assign("a", "b");
        w.dedent();
        w.line("end;");
        assert_eq!(w.finish(), "begin\n    a <= b;\nend;\n");
    }

    #[test]
    fn select_wraps_branches() {
        let mut w = VhdlWriter::new();
        w.indent();
        let branches = vec![("x".to_string(), "c='1'".to_string())];
        w.select("m", &branches, "(others => '0')");
        assert_eq!(
            w.finish(),
            "    m <= x when c='1' else\n        (others => '0');\n"
        );
    }

    #[test]
    fn empty_or_is_zero() {
        let mut w = VhdlWriter::new();
        w.or_reduce("ack", &[]);
        assert_eq!(w.finish(), "ack <= '0';\n");

        let mut w = VhdlWriter::new();
        w.or_reduce("ack", &["a".to_string(), "b".to_string()]);
        assert_eq!(w.finish(), "ack <= a or\n    b;\n");
    }

    #[test]
    fn binary_keeps_low_bits() {
        assert_eq!(binary(0x10, 8), "00010000");
        assert_eq!(binary(5, 2), "01");
        assert_eq!(binary(0, 0), "");
    }

    #[test]
    fn types() {
        assert_eq!(logic_type(1), "std_logic");
        assert_eq!(logic_type(16), "std_logic_vector(15 downto 0)");
    }
}
