//! Domain layer for the chat relay.
//!
//! This module contains the message model, the membership set with its
//! broadcast policy, and the transport seams the connection pumps work
//! against. It is independent of axum and of the wire format.

pub mod entity;
pub mod error;
pub mod factory;
pub mod membership;
pub mod transport;
pub mod value_object;

pub use entity::{Member, MemberInfo, Message, OutboundReceiver, OutboundSender};
pub use error::{TransportError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use membership::{BroadcastOutcome, EvictionReason, Membership};
pub use transport::{ConnectionCloser, Frame, FrameReader, FrameWriter};
#[cfg(test)]
pub use transport::MockFrameWriter;
pub use value_object::{ConnectionId, MessageContent, Timestamp, UserName};
