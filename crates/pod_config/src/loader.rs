//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, SizeValue};
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the project file looked up in a project directory.
pub const CONFIG_FILE: &str = "pod.toml";

/// Loads and validates a `pod.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `pod.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks required fields, name uniqueness inside each instance, and that
/// every reference names a declared instance.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    for (name, instance) in &config.instances {
        if instance.component.is_empty() {
            return Err(ConfigError::MissingField(format!(
                "instances.{name}.component"
            )));
        }
        let mut interfaces = BTreeSet::new();
        let mut ports = BTreeSet::new();
        for iface in &instance.interfaces {
            if !interfaces.insert(iface.name.as_str()) {
                return Err(ConfigError::Duplicate {
                    instance: name.clone(),
                    what: "interface",
                    name: iface.name.clone(),
                });
            }
            for port in &iface.ports {
                if !ports.insert(port.name.as_str()) {
                    return Err(ConfigError::Duplicate {
                        instance: name.clone(),
                        what: "port",
                        name: port.name.clone(),
                    });
                }
                if port.size == SizeValue::Bits(0) {
                    return Err(ConfigError::ZeroWidth(format!(
                        "{name}.{}.{}",
                        iface.name, port.name
                    )));
                }
            }
        }
    }

    let endpoints = config
        .bind
        .iter()
        .flat_map(|b| [&b.master, &b.slave])
        .chain(config.connect.iter().flat_map(|c| [&c.from, &c.to]))
        .chain(config.clock_domain.iter().flat_map(|c| [&c.source, &c.dest]))
        .chain(config.force.iter().map(|f| &f.port));
    for path in endpoints {
        let Some((instance, _)) = path.split_once('.') else {
            return Err(ConfigError::BadPath(path.clone()));
        };
        if !config.instances.contains_key(instance) {
            return Err(ConfigError::UnknownInstance(instance.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM: &str = r#"
auto_connect = ["wishbone"]

[project]
name = "blinky"
author = "Fabien"

[check]
deny = ["W101"]
allow = ["unbound-slave"]

[instances.cpu]
component = "cpu"

[[instances.cpu.interfaces]]
name = "mwb"
class = "master"
bus = "wishbone"
ports = [
    { name = "wbm_adr", dir = "out", size = 16, type = "ADR" },
    { name = "wbm_ack", dir = "in", type = "ACK" },
]

[instances.led]
component = "led"

[[instances.led.interfaces]]
name = "swb"
class = "slave"
bus = "wishbone"
base = 0x10
ports = [{ name = "wbs_ack", dir = "out", type = "ACK" }]

[[bind]]
master = "cpu.mwb"
slave = "led.swb"

[[connect]]
from = "led.swb.wbs_ack"
to = "cpu.mwb.wbm_ack[0]"

[[force]]
port = "cpu.mwb.wbm_ack"
value = "gnd"
"#;

    #[test]
    fn parse_full_config() {
        let config = load_config_from_str(SYSTEM).unwrap();
        assert_eq!(config.project.name, "blinky");
        assert_eq!(config.project.author, "Fabien");
        assert_eq!(config.project.components, "components");
        assert_eq!(config.auto_connect, vec!["wishbone"]);
        assert_eq!(config.check.deny, vec!["W101"]);
        assert_eq!(config.instances.len(), 2);
        assert_eq!(config.instances["led"].interfaces[0].base, Some(0x10));
        assert_eq!(config.bind[0].slave, "led.swb");
        assert_eq!(config.connect[0].to, "cpu.mwb.wbm_ack[0]");
        assert_eq!(config.force[0].value, "gnd");
    }

    #[test]
    fn parse_minimal_config() {
        let config = load_config_from_str("[project]\nname = \"empty\"\n").unwrap();
        assert!(config.instances.is_empty());
        assert!(config.bind.is_empty());
        assert!(config.project.busses.is_none());
    }

    #[test]
    fn missing_name_errors() {
        let err = load_config_from_str("[project]\nname = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_instance_in_bind_errors() {
        let toml = r#"
[project]
name = "demo"

[[bind]]
master = "cpu.mwb"
slave = "led.swb"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownInstance(name) if name == "cpu"));
    }

    #[test]
    fn bare_instance_reference_errors() {
        let toml = "[project]\nname = \"demo\"\n[[force]]\nport = \"cpu\"\nvalue = \"gnd\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::BadPath(path) if path == "cpu"));
    }

    #[test]
    fn duplicate_port_errors() {
        let toml = r#"
[project]
name = "demo"

[instances.gpio]
component = "gpio"

[[instances.gpio.interfaces]]
name = "a"
class = "gls"
ports = [{ name = "x", dir = "in" }]

[[instances.gpio.interfaces]]
name = "b"
class = "gls"
ports = [{ name = "x", dir = "out" }]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Duplicate { what: "port", ref name, .. } if name == "x"
        ));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), SYSTEM).unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "blinky");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
