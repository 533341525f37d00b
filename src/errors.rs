// src/errors.rs

//! Crate-wide error types and aliases.

use thiserror::Error;

/// Errors raised while starting or configuring the service.
#[derive(Error, Debug)]
pub enum ScanqueueError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Reasons a single scan request is turned away before its command runs.
///
/// Execution failures (spawn errors, timeouts) are not errors here; they are
/// reported through [`crate::types::ExecutionResult`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("missing or empty 'url' in request body")]
    MissingLocator,

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("Too many requests in the queue")]
    QueueFull,

    #[error("admission queue was empty right after enqueue")]
    QueueEmpty,
}

pub type Result<T> = std::result::Result<T, ScanqueueError>;
