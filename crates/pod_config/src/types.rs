//! Configuration types deserialized from `pod.toml`.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// The top-level project configuration parsed from `pod.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Bus names whose unbound slaves are bound to the bus's only master.
    #[serde(default)]
    pub auto_connect: Vec<String>,
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Validation settings.
    #[serde(default)]
    pub check: CheckConfig,
    /// Component instances by instance name.
    #[serde(default)]
    pub instances: BTreeMap<String, InstanceConfig>,
    /// Slave-to-master bindings, applied in order.
    #[serde(default)]
    pub bind: Vec<BindDef>,
    /// Pin, port or interface connections, applied in order.
    #[serde(default)]
    pub connect: Vec<ConnectDef>,
    /// Clock domains.
    #[serde(default)]
    pub clock_domain: Vec<ClockDomainDef>,
    /// Ports tied to a constant.
    #[serde(default)]
    pub force: Vec<ForceDef>,
}

/// Core project metadata required in every `pod.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// Author named in generated file headers.
    #[serde(default)]
    pub author: String,
    /// Directory, relative to the project, where generated components go.
    #[serde(default = "default_components_dir")]
    pub components: String,
    /// Directory of `<bus>.toml` descriptors overriding the built-in ones.
    #[serde(default)]
    pub busses: Option<String>,
}

fn default_components_dir() -> String {
    "components".to_string()
}

/// Check configuration controlling which rules are reported.
#[derive(Debug, Default, Deserialize)]
pub struct CheckConfig {
    /// Rule codes or names to treat as errors.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Rule codes or names to suppress.
    #[serde(default)]
    pub allow: Vec<String>,
}

/// One placed component.
#[derive(Debug, Deserialize)]
pub struct InstanceConfig {
    /// Component name; also the prefix of automatic instance names.
    pub component: String,
    /// Generic values. Integers and strings are both accepted.
    #[serde(default, deserialize_with = "deserialize_generic_values")]
    pub generics: BTreeMap<String, String>,
    /// Computed generics: generic name to the port whose connected size it
    /// takes.
    #[serde(default)]
    pub computed: BTreeMap<String, String>,
    /// Interfaces in declaration order.
    #[serde(default)]
    pub interfaces: Vec<InterfaceConfig>,
}

/// One interface of an instance.
#[derive(Debug, Deserialize)]
pub struct InterfaceConfig {
    /// Interface name.
    pub name: String,
    /// `master`, `slave`, `clk_rst`, `gls` or `intercon`.
    pub class: String,
    /// Bus descriptor name, for bus interfaces.
    #[serde(default)]
    pub bus: Option<String>,
    /// Data width overriding the width of the data port.
    #[serde(default)]
    pub data_size: Option<u32>,
    /// Explicit base address of a slave window.
    #[serde(default)]
    pub base: Option<u64>,
    /// Ports in declaration order.
    #[serde(default)]
    pub ports: Vec<PortConfig>,
    /// Registers of a slave.
    #[serde(default)]
    pub registers: Vec<RegisterConfig>,
}

/// One port of an interface.
#[derive(Debug, Deserialize)]
pub struct PortConfig {
    /// Port name.
    pub name: String,
    /// `in`, `out`, `inout`, `lock` or `clock`.
    pub dir: String,
    /// Width in bits, or the name of the generic giving it.
    #[serde(default = "SizeValue::one")]
    pub size: SizeValue,
    /// Port-type tag matched against bus descriptors.
    #[serde(default, rename = "type")]
    pub port_type: Option<String>,
    /// Whether the port may be partially connected.
    #[serde(default)]
    pub variable: bool,
    /// Value of an unconnected input, 0 or 1.
    #[serde(default)]
    pub unconnected: Option<u8>,
}

/// One register of a slave interface.
#[derive(Debug, Deserialize)]
pub struct RegisterConfig {
    /// Register name.
    pub name: String,
    /// Offset in data words from the slave's base.
    pub offset: u64,
    /// `read`, `write` or `both`.
    #[serde(default = "default_access")]
    pub access: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
}

fn default_access() -> String {
    "both".to_string()
}

/// Width of a port: a literal bit count or the name of a generic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeValue {
    /// Literal width in bits.
    Bits(u32),
    /// Width given by a generic of the instance.
    Generic(String),
}

impl SizeValue {
    fn one() -> Self {
        SizeValue::Bits(1)
    }
}

impl<'de> Deserialize<'de> for SizeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SizeVisitor;

        impl Visitor<'_> for SizeVisitor {
            type Value = SizeValue;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a bit count or a generic name")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(SizeValue::Bits)
                    .map_err(|_| E::custom(format!("port size {v} out of range")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(SizeValue::Bits)
                    .map_err(|_| E::custom(format!("port size {v} out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(SizeValue::Generic(v.to_string()))
            }
        }

        deserializer.deserialize_any(SizeVisitor)
    }
}

/// Deserializes a table whose values may be integers, strings or booleans,
/// keeping each as its text form.
fn deserialize_generic_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarText(String);

    impl<'de> Deserialize<'de> for ScalarText {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct ScalarVisitor;

            impl Visitor<'_> for ScalarVisitor {
                type Value = ScalarText;

                fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    formatter.write_str("an integer, a string or a boolean")
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                    Ok(ScalarText(v.to_string()))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                    Ok(ScalarText(v.to_string()))
                }

                fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                    Ok(ScalarText(v.to_string()))
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Ok(ScalarText(v.to_string()))
                }
            }

            deserializer.deserialize_any(ScalarVisitor)
        }
    }

    struct TableVisitor;

    impl<'de> Visitor<'de> for TableVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a table of generic values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut values = BTreeMap::new();
            while let Some((key, ScalarText(value))) = map.next_entry::<String, ScalarText>()? {
                values.insert(key, value);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_map(TableVisitor)
}

/// A slave bound to a master, both as `instance.interface`.
#[derive(Debug, Deserialize)]
pub struct BindDef {
    /// Master interface path.
    pub master: String,
    /// Slave interface path.
    pub slave: String,
}

/// A connection between two endpoints.
///
/// Endpoints are `instance.interface` (whole interfaces paired by port type),
/// `instance.interface.port` (whole ports), or `instance.interface.port[n]`
/// (single pins). `from` is the source side.
#[derive(Debug, Deserialize)]
pub struct ConnectDef {
    /// Source endpoint.
    pub from: String,
    /// Destination endpoint.
    pub to: String,
}

/// A clock/reset interface feeding another.
#[derive(Debug, Deserialize)]
pub struct ClockDomainDef {
    /// Driving `clk_rst` interface.
    pub source: String,
    /// Driven `clk_rst` interface.
    pub dest: String,
}

/// A port tied to a constant.
#[derive(Debug, Deserialize)]
pub struct ForceDef {
    /// Port path, `instance.interface.port`.
    pub port: String,
    /// `gnd`, `vcc` or `undef`.
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn port_size_number_or_generic() {
        let toml = r#"
[project]
name = "demo"

[instances.ram]
component = "ram"

[[instances.ram.interfaces]]
name = "swb"
class = "slave"
ports = [
    { name = "wbs_adr", dir = "in", size = "ADDR_WIDTH", type = "ADR" },
    { name = "wbs_ack", dir = "out", type = "ACK" },
    { name = "wbs_dat_o", dir = "out", size = 16, type = "DAT_R" },
]
"#;
        let config = load_config_from_str(toml).unwrap();
        let ports = &config.instances["ram"].interfaces[0].ports;
        assert_eq!(ports[0].size, SizeValue::Generic("ADDR_WIDTH".into()));
        assert_eq!(ports[1].size, SizeValue::Bits(1));
        assert_eq!(ports[2].size, SizeValue::Bits(16));
        assert_eq!(ports[0].port_type.as_deref(), Some("ADR"));
    }

    #[test]
    fn generic_values_accept_scalars() {
        let toml = r#"
[project]
name = "demo"

[instances.led]
component = "led"

[instances.led.generics]
id = 0
wide = true
mode = "fast"
"#;
        let config = load_config_from_str(toml).unwrap();
        let generics = &config.instances["led"].generics;
        assert_eq!(generics["id"], "0");
        assert_eq!(generics["wide"], "true");
        assert_eq!(generics["mode"], "fast");
    }

    #[test]
    fn register_access_defaults_to_both() {
        let toml = r#"
[project]
name = "demo"

[instances.led]
component = "led"

[[instances.led.interfaces]]
name = "swb"
class = "slave"
registers = [{ name = "ctrl", offset = 0 }, { name = "status", offset = 1, access = "read" }]
"#;
        let config = load_config_from_str(toml).unwrap();
        let regs = &config.instances["led"].interfaces[0].registers;
        assert_eq!(regs[0].access, "both");
        assert_eq!(regs[1].access, "read");
    }
}
