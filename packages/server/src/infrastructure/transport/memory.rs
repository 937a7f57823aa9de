//! In-process frame transport backed by tokio channels.
//!
//! [`memory_transport`] returns the server-side halves together with a
//! [`MemoryPeer`] playing the remote client. Test builds only: it drives the
//! pumps and the connection bootstrap without a socket.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{Frame, FrameReader, FrameWriter, TransportError};

/// Server-side read half
pub struct MemoryReader {
    incoming: mpsc::Receiver<Result<Frame, TransportError>>,
}

/// Server-side write half
pub struct MemoryWriter {
    outgoing: Option<mpsc::Sender<Frame>>,
}

/// The remote end of an in-memory connection
pub struct MemoryPeer {
    to_server: Option<mpsc::Sender<Result<Frame, TransportError>>>,
    from_server: mpsc::Receiver<Frame>,
}

/// Create a connected reader/writer pair and its peer.
///
/// Each direction buffers up to `capacity` frames (at least 1); once the peer
/// stops reading, server writes wait.
pub fn memory_transport(capacity: usize) -> (MemoryReader, MemoryWriter, MemoryPeer) {
    let capacity = capacity.max(1);
    let (to_server, incoming) = mpsc::channel(capacity);
    let (outgoing, from_server) = mpsc::channel(capacity);
    (
        MemoryReader { incoming },
        MemoryWriter {
            outgoing: Some(outgoing),
        },
        MemoryPeer {
            to_server: Some(to_server),
            from_server,
        },
    )
}

#[async_trait]
impl FrameReader for MemoryReader {
    async fn read_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        match self.incoming.recv().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FrameWriter for MemoryWriter {
    async fn write_frame(&mut self, frame: Frame) -> Result<(), TransportError> {
        let Some(outgoing) = &self.outgoing else {
            return Err(TransportError::Closed);
        };
        outgoing
            .send(frame)
            .await
            .map_err(|_| TransportError::Write("peer went away".to_string()))
    }

    async fn close(&mut self) {
        self.outgoing = None;
    }
}

impl MemoryPeer {
    /// Send a frame to the server
    pub async fn send(&self, frame: Frame) -> Result<(), TransportError> {
        let Some(to_server) = &self.to_server else {
            return Err(TransportError::Closed);
        };
        to_server
            .send(Ok(frame))
            .await
            .map_err(|_| TransportError::Closed)
    }

    /// Send a text frame to the server
    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), TransportError> {
        self.send(Frame::Text(text.into())).await
    }

    /// Make the server's next read fail with `error`
    pub async fn fail(&self, error: TransportError) -> Result<(), TransportError> {
        let Some(to_server) = &self.to_server else {
            return Err(TransportError::Closed);
        };
        to_server
            .send(Err(error))
            .await
            .map_err(|_| TransportError::Closed)
    }

    /// Close the peer's sending direction; the server reads end-of-stream.
    ///
    /// Frames the server already wrote can still be received.
    pub fn hang_up(&mut self) {
        self.to_server = None;
    }

    /// Receive the next frame the server wrote.
    ///
    /// Returns `None` once the server closed its write half.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.from_server.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writer_close_twice_is_harmless() {
        // テスト項目: close を 2 回呼んでもエラーにならず、相手側が見る切断は 1 回だけ
        // given (前提条件):
        let (_reader, mut writer, mut peer) = memory_transport(4);
        writer
            .write_frame(Frame::Text("before close".to_string()))
            .await
            .unwrap();

        // when (操作):
        writer.close().await;
        writer.close().await;

        // then (期待する結果):
        let result = writer.write_frame(Frame::Text("after close".to_string())).await;
        assert_eq!(result, Err(TransportError::Closed));

        assert_eq!(peer.recv().await, Some(Frame::Text("before close".to_string())));
        assert_eq!(peer.recv().await, None);
        assert_eq!(peer.recv().await, None);
    }

    #[tokio::test]
    async fn test_hang_up_ends_server_reads() {
        // テスト項目: 相手側が送信方向を閉じると、送信済みフレームの後に end-of-stream が読める
        // given (前提条件):
        let (mut reader, _writer, mut peer) = memory_transport(4);
        peer.send_text("last words").await.unwrap();

        // when (操作):
        peer.hang_up();

        // then (期待する結果):
        assert_eq!(
            reader.read_frame().await,
            Ok(Some(Frame::Text("last words".to_string())))
        );
        assert_eq!(reader.read_frame().await, Ok(None));
        assert_eq!(peer.send_text("too late").await, Err(TransportError::Closed));
    }
}
