//! Configuration error types.

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    /// Hostname does not map to a supported machine.
    #[error("hostname {0:?} does not match a supported system")]
    UnknownHost(String),

    /// A mandatory value was not provided by any configuration layer.
    #[error("{0} is required; provide it on the command line or in the configuration file")]
    MissingArgument(&'static str),
}
