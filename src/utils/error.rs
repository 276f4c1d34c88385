//! Error types for the bulk optimizer.
//!
//! Provides a single error enum built with `thiserror` so every stage of the
//! pipeline reports failures the same way.

use std::io;
use thiserror::Error;

/// Main error type for the optimizer.
///
/// Per-image transformation errors are logged and dropped by the batch
/// processor; every other variant is fatal for the run.
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// Missing or malformed environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings outside their accepted range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Listing or transformation call failed (network, auth, rate limit, bad response)
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// Report could not be written
    #[error("IO error: {0}")]
    IO(String),

    /// Report could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience result type for optimizer operations.
pub type OptimizerResult<T> = Result<T, OptimizerError>;

impl OptimizerError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn remote<T: Into<String>>(msg: T) -> Self {
        Self::RemoteService(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }
}

// Convert std::io::Error to OptimizerError
impl From<io::Error> for OptimizerError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<serde_json::Error> for OptimizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for OptimizerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::RemoteService(format!("Malformed response: {}", err))
        } else {
            Self::RemoteService(err.to_string())
        }
    }
}

impl From<envy::Error> for OptimizerError {
    fn from(err: envy::Error) -> Self {
        Self::Config(err.to_string())
    }
}
