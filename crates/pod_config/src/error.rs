//! Errors raised while reading a `pod.toml`.

/// A `pod.toml` that cannot be read, parsed, or accepted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// An instance declares two interfaces, or two ports, with one name.
    #[error("instance '{instance}' declares {what} '{name}' twice")]
    Duplicate {
        /// Declaring instance.
        instance: String,
        /// `interface` or `port`.
        what: &'static str,
        /// The repeated name.
        name: String,
    },

    /// A port declared with a literal width of zero.
    #[error("port '{0}' has zero width")]
    ZeroWidth(String),

    /// A reference that is not an `instance.interface[.port]` path.
    #[error("'{0}' is not an interface or port path")]
    BadPath(String),

    /// A reference to an instance missing from `[instances]`.
    #[error("unknown instance '{0}'")]
    UnknownInstance(String),
}
