//! axum WebSocket adapter for the frame transport seams.

use std::fmt::Display;

use async_trait::async_trait;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{SplitSink, SplitStream, StreamExt},
};

use crate::domain::{Frame, FrameReader, FrameWriter, TransportError};

/// Read half of an upgraded WebSocket
pub struct WebSocketReader {
    stream: SplitStream<WebSocket>,
}

/// Write half of an upgraded WebSocket.
///
/// Generic over the sink so the close handling can run without a socket.
pub struct WebSocketWriter<S = SplitSink<WebSocket, WsMessage>> {
    sink: S,
    closed: bool,
}

impl<S> WebSocketWriter<S> {
    fn new(sink: S) -> Self {
        Self {
            sink,
            closed: false,
        }
    }
}

/// Split an upgraded socket into its two halves
pub fn split_websocket(socket: WebSocket) -> (WebSocketReader, WebSocketWriter) {
    let (sink, stream) = socket.split();
    (WebSocketReader { stream }, WebSocketWriter::new(sink))
}

#[async_trait]
impl FrameReader for WebSocketReader {
    async fn read_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        while let Some(msg) = self.stream.next().await {
            let msg = msg.map_err(|e| TransportError::Read(e.to_string()))?;

            match msg {
                WsMessage::Text(text) => return Ok(Some(Frame::Text(text.as_str().to_owned()))),
                WsMessage::Binary(bytes) => return Ok(Some(Frame::Binary(bytes.to_vec()))),
                WsMessage::Ping(_) | WsMessage::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::trace!("Received ping/pong");
                }
                WsMessage::Close(frame) => {
                    tracing::debug!("Peer requested close: {:?}", frame);
                    return Ok(None);
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<S> FrameWriter for WebSocketWriter<S>
where
    S: Sink<WsMessage> + Unpin + Send,
    S::Error: Display,
{
    async fn write_frame(&mut self, frame: Frame) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let msg = match frame {
            Frame::Text(text) => WsMessage::Text(text.into()),
            Frame::Binary(bytes) => WsMessage::Binary(bytes.into()),
        };
        self.sink
            .send(msg)
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.sink.close().await {
            tracing::debug!("Closing WebSocket failed (already gone?): {}", e);
        }
    }
}
