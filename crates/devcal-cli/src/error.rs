//! CLI error types.

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] devcal_bridge::ConfigError),

    #[error("unknown profile '{0}' (expected content_provider or event_store)")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] devcal_protocol::ProtocolError),

    #[error("tracing setup failed: {0}")]
    Tracing(#[from] devcal_core::TracingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
