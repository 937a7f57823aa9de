//! WebSocket message DTOs for the chat relay.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Frame, Message};

/// Errors raised while extracting message content from a frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameDecodeError {
    #[error("binary frame is not valid UTF-8")]
    InvalidUtf8,
}

/// Chat message sent by a client.
///
/// Only `content` is read; any sender or timestamp the client supplies is
/// ignored and assigned by the server instead.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub content: String,
}

impl IncomingMessage {
    /// Extract the message body from a frame.
    ///
    /// A text frame holding `{"content": ...}` yields that content. Any other
    /// text frame, and any binary frame holding UTF-8, is taken verbatim.
    pub fn content_from_frame(frame: Frame) -> Result<String, FrameDecodeError> {
        match frame {
            Frame::Text(text) => match serde_json::from_str::<IncomingMessage>(&text) {
                Ok(incoming) => Ok(incoming.content),
                Err(e) => {
                    tracing::debug!("Frame is not a JSON chat message, using raw text: {}", e);
                    Ok(text)
                }
            },
            Frame::Binary(bytes) => {
                String::from_utf8(bytes).map_err(|_| FrameDecodeError::InvalidUtf8)
            }
        }
    }
}

/// Chat message relayed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// Omitted for anonymous senders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub content: String,
    /// RFC 3339, UTC
    pub sent_at: String,
}

impl OutgoingMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&Message> for OutgoingMessage {
    fn from(message: &Message) -> Self {
        Self {
            sender: message.sender.as_ref().map(|name| name.as_str().to_string()),
            content: message.content.as_str().to_string(),
            sent_at: message.sent_at.to_rfc3339(),
        }
    }
}
