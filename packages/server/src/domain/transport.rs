//! Frame transport abstraction consumed by the connection pumps.
//!
//! A connection is split into a [`FrameReader`] owned by the inbound pump and a
//! [`FrameWriter`] owned by the outbound pump. The two pumps share a
//! [`ConnectionCloser`] so that either side can end the connection.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::TransportError;

/// A single transport frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

/// Read half of a frame connection
#[async_trait]
pub trait FrameReader: Send {
    /// Wait for the next data frame.
    ///
    /// Returns `Ok(None)` once the peer has closed the connection.
    async fn read_frame(&mut self) -> Result<Option<Frame>, TransportError>;
}

/// Write half of a frame connection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameWriter: Send {
    /// Write one frame.
    async fn write_frame(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Close the connection. Best-effort; calling it again is a no-op.
    async fn close(&mut self);
}

/// One-time close signal shared by the two pumps of a connection.
///
/// `close` may be called any number of times from either pump; only the first
/// call has an effect.
#[derive(Debug, Clone, Default)]
pub struct ConnectionCloser {
    token: CancellationToken,
}

impl ConnectionCloser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that the connection is closing
    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once `close` has been called
    pub async fn closed(&self) {
        self.token.cancelled().await
    }
}
