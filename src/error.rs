//! Error types for Parley.
//!
//! Defines the main error enum returned to the host. Argument binding has its
//! own local error type, [`BindError`](crate::commands::BindError), because a
//! failed bind is ordinary control flow rather than a fault.

use thiserror::Error;

/// Main error type for Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// Configuration errors (invalid config file, unknown policy name, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command overload faulted while binding or running.
    #[error("Command error: {0}")]
    Command(String),

    /// An interaction handler failed to process a response.
    #[error("Interaction error: {0}")]
    Interaction(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a command error with the given message.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Creates an interaction error with the given message.
    pub fn interaction(msg: impl Into<String>) -> Self {
        Self::Interaction(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Command(_) => "Command Error",
            Self::Interaction(_) => "Interaction Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ParleyError.
pub type Result<T> = std::result::Result<T, ParleyError>;
