//! VHDL pieces shared by every protocol generator.

use pod_bus::Role;

use crate::context::{Endpoint, InterconContext};
use crate::error::InterconError;
use crate::writer::{binary, logic_type, VhdlWriter, TAB};

/// Writes the file header naming the file, project and author, then the
/// library clauses.
pub fn header(w: &mut VhdlWriter, ctx: &InterconContext) {
    let rule = "-".repeat(75);
    w.line(&rule);
    w.comment(format!("File        : {}.vhd", ctx.instance));
    w.comment(format!("Project     : {}", ctx.project));
    w.comment(format!("Author      : {}", ctx.author));
    w.comment(format!("Description : {}", ctx.description));
    w.comment("Generated by pod; edits are lost on regeneration.");
    w.line(&rule);
    w.blank();
    w.line("library IEEE;");
    w.line("use IEEE.std_logic_1164.all;");
    w.line("use IEEE.numeric_std.all;");
    w.blank();
}

/// Writes the entity: one port group per bridged interface, slaves first.
pub fn entity(w: &mut VhdlWriter, ctx: &InterconContext) {
    let mut ports = String::new();
    for endpoint in ctx.endpoints() {
        ports.push('\n');
        ports.push_str(&format!("{TAB}{TAB}-- {} connection\n", endpoint.mirror_name()));
        for mp in &endpoint.ports {
            ports.push_str(&format!(
                "{TAB}{TAB}{:<40} : {:<5} {};\n",
                mp.name,
                mp.direction.as_str(),
                logic_type(mp.width)
            ));
        }
    }
    // The last port takes no separator.
    if ports.ends_with(";\n") {
        ports.truncate(ports.len() - 2);
        ports.push('\n');
    }

    w.line(format!("Entity {} is", ctx.component));
    w.indent();
    w.line("port");
    w.line("(");
    w.raw(&ports);
    w.line(");");
    w.dedent();
    w.line("end entity;");
    w.blank();
}

/// Writes `architecture <component>_1 of <component> is`; signal
/// declarations go between this and [`begin`].
pub fn architecture_head(w: &mut VhdlWriter, ctx: &InterconContext) {
    w.line(format!("architecture {0}_1 of {0} is", ctx.component));
    w.indent();
}

/// Closes the declarative part.
pub fn begin(w: &mut VhdlWriter) {
    w.dedent();
    w.line("begin");
    w.indent();
}

/// Closes the architecture.
pub fn architecture_foot(w: &mut VhdlWriter, ctx: &InterconContext) {
    w.dedent();
    w.blank();
    w.line(format!("end architecture {}_1;", ctx.component));
}

/// Declares one chip-select signal, cleared at start-up.
pub fn declare_cs(w: &mut VhdlWriter, name: &str) {
    w.line(format!("signal {name:<20} : std_logic := '0';"));
}

/// Drives every slave's clock and reset from the master's, ungated.
///
/// Slaves without a reset port only get the clock. With `labelled`, each
/// slave's pair is preceded by a `-- for <instance>` comment.
pub fn clock_reset_fanout(
    w: &mut VhdlWriter,
    ctx: &InterconContext,
    clock: impl Into<Role>,
    reset: impl Into<Role>,
    labelled: bool,
) -> Result<(), InterconError> {
    let (clock, reset) = (clock.into(), reset.into());
    let master_clk = ctx.master.name_of(clock)?;
    let master_rst = ctx.master.name_of(reset)?;
    w.blank();
    w.comment("Clock and Reset connection");
    for slave in &ctx.slaves {
        if labelled {
            w.blank();
            w.comment(format!("for {}", slave.instance));
        }
        if let Some(rst) = slave.signal(reset) {
            w.assign(&rst.name, master_rst);
        }
        w.assign(slave.name_of(clock)?, master_clk);
    }
    Ok(())
}

/// Condition selecting `slave`'s window on a master address.
///
/// The top `addr_width - window_bits` bits of `addr` are compared with the
/// slave's base; the window bits are the slave's address bits plus its byte
/// offset bits. A window filling the whole master address space only tests
/// `valid`. A window reaching past the master address space is an error.
pub fn address_match(
    addr: &str,
    addr_width: u32,
    slave: &Endpoint,
    valid: &str,
) -> Result<String, InterconError> {
    let window = slave.addr_size + slave.byte_shift();
    let end = 1u128
        .checked_shl(window)
        .map(|size| u128::from(slave.base) + size);
    let fits = match (end, 1u128.checked_shl(addr_width)) {
        (Some(end), Some(space)) => end <= space,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if !fits {
        return Err(InterconError::WindowOutOfRange {
            slave: slave.path(),
            base: slave.base,
            window_bits: window,
            addr_width,
        });
    }
    if window == addr_width {
        return Ok(format!("{valid}='1'"));
    }
    let bits = binary(slave.base, addr_width);
    let top = &bits[..(addr_width - window) as usize];
    Ok(format!(
        "{addr}({} downto {window})=\"{top}\" and {valid}='1'",
        addr_width - 1
    ))
}

/// One chip-select of the decode process.
#[derive(Debug, Clone)]
pub struct ChipSelect {
    /// Signal name.
    pub name: String,
    /// Condition asserting it.
    pub condition: String,
}

/// Writes the clocked, reset-synchronous `decodeproc` process.
///
/// On reset every chip-select is cleared; on each rising clock edge each is
/// set to its condition. `reset_active` is the reset level, `'1'` or `'0'`.
/// Callers write the "Address decoding" banner and any slave address
/// slices first.
pub fn decode_process(
    w: &mut VhdlWriter,
    clk: &str,
    rst: &str,
    reset_active: char,
    sensitivity: &[&str],
    selects: &[ChipSelect],
) {
    let mut list = vec![clk, rst];
    list.extend_from_slice(sensitivity);

    w.line(format!("decodeproc : process({})", list.join(", ")));
    w.line("begin");
    w.indent();
    w.line(format!("if {rst}='{reset_active}' then"));
    w.indent();
    for cs in selects {
        w.assign(&cs.name, "'0'");
    }
    w.dedent();
    w.line(format!("elsif rising_edge({clk}) then"));
    w.indent();
    for cs in selects {
        w.blank();
        w.line(format!("if {} then", cs.condition));
        w.indent();
        w.assign(&cs.name, "'1'");
        w.dedent();
        w.line("else");
        w.indent();
        w.assign(&cs.name, "'0'");
        w.dedent();
        w.line("end if;");
    }
    w.blank();
    w.dedent();
    w.line("end if;");
    w.dedent();
    w.line("end process decodeproc;");
    w.blank();
}

/// `(signal and cs )`.
pub fn gated(signal: &str, cs: &str) -> String {
    format!("({signal} and {cs} )")
}

/// `value when (signal and cs ) = '1' else (others => '0')`.
pub fn gated_bus(value: &str, signal: &str, cs: &str) -> String {
    format!("{value} when {} = '1' else (others => '0')", gated(signal, cs))
}

/// `(ack and cs)`.
pub fn fan_in_term(signal: &str, cs: &str) -> String {
    format!("({signal} and {cs})")
}

/// `cs='1'`.
pub fn selected(cs: &str) -> String {
    format!("{cs}='1'")
}
