//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserName validation error
    #[error("UserName cannot be empty")]
    UserNameEmpty,

    /// UserName too long error
    #[error("UserName cannot exceed {max} bytes (got {actual})")]
    UserNameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} bytes (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors raised by a frame transport.
///
/// Every variant is fatal to the connection it came from and is never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Reading a frame failed (reset, protocol violation, ...)
    #[error("failed to read frame: {0}")]
    Read(String),

    /// Writing a frame failed
    #[error("failed to write frame: {0}")]
    Write(String),

    /// The connection was already closed
    #[error("connection closed")]
    Closed,
}
