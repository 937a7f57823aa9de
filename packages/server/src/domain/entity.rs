//! Core domain models for the chat relay.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::value_object::{ConnectionId, MessageContent, Timestamp, UserName};

/// Sending half of a member's outbound queue.
///
/// The Room holds the only instance; dropping it closes the queue.
pub type OutboundSender = mpsc::Sender<Arc<Message>>;

/// Receiving half of a member's outbound queue, drained by the outbound pump.
pub type OutboundReceiver = mpsc::Receiver<Arc<Message>>;

/// A chat message relayed through the room.
///
/// Shared between recipients as `Arc<Message>` and never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message body
    pub content: MessageContent,
    /// Display name of the sender, `None` for anonymous participants
    pub sender: Option<UserName>,
    /// Time the server received the message
    pub sent_at: Timestamp,
}

impl Message {
    /// Create a new message
    pub fn new(content: MessageContent, sender: Option<UserName>, sent_at: Timestamp) -> Self {
        Self {
            content,
            sender,
            sent_at,
        }
    }
}

/// A participant registered with the room, together with the sending half of
/// its outbound queue.
#[derive(Debug)]
pub struct Member {
    /// Connection identifier
    pub id: ConnectionId,
    /// Display name, if the identity source supplied one
    pub name: Option<UserName>,
    /// Timestamp when the member joined
    pub joined_at: Timestamp,
    outbound: OutboundSender,
}

impl Member {
    /// Create a new member owning the sending half of an outbound queue
    pub fn new(
        id: ConnectionId,
        name: Option<UserName>,
        joined_at: Timestamp,
        outbound: OutboundSender,
    ) -> Self {
        Self {
            id,
            name,
            joined_at,
            outbound,
        }
    }

    /// Try to enqueue without waiting.
    pub(crate) fn try_deliver(
        &self,
        message: Arc<Message>,
    ) -> Result<(), mpsc::error::TrySendError<Arc<Message>>> {
        self.outbound.try_send(message)
    }

    /// Point-in-time view of this member, without the queue.
    pub fn to_info(&self) -> MemberInfo {
        MemberInfo {
            id: self.id,
            name: self.name.clone(),
            joined_at: self.joined_at,
        }
    }
}

/// Read-only view of a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub id: ConnectionId,
    pub name: Option<UserName>,
    pub joined_at: Timestamp,
}
