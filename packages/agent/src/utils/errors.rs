// packages/agent/src/utils/errors.rs
//! Error types for the agent
//!
//! Nothing in this crate lets an `AgentError` escape into the host page.
//! Errors are returned across internal seams (transport, config loading,
//! event building) and then logged and discarded at the containment
//! boundaries in `capture`, `performance` and `reporting`.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent errors
#[derive(Debug, Error)]
pub enum AgentError {
    /// `service_name` was empty when an eager check was requested
    #[error("service name is required")]
    MissingServiceName,

    /// `report_url` was empty when an eager check was requested
    #[error("report URL is required")]
    MissingReportUrl,

    /// Options could not be loaded or parsed
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Event could not be serialized for the wire
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Destination is not a usable URL
    #[error("invalid report URL '{url}': {reason}")]
    InvalidReportUrl { url: String, reason: String },

    /// Transport refused the event
    #[error("transport failed: {0}")]
    TransportFailed(String),

    /// Bounded transport queue is full
    #[error("transport queue full")]
    TransportFull,

    /// Transport has been closed by its receiving side
    #[error("transport closed")]
    TransportClosed,

    /// A native signal did not carry the data a strategy needs
    #[error("malformed {signal} signal: {reason}")]
    MalformedSignal { signal: &'static str, reason: String },
}

impl From<::config::ConfigError> for AgentError {
    fn from(err: ::config::ConfigError) -> Self {
        AgentError::ConfigError(err.to_string())
    }
}
