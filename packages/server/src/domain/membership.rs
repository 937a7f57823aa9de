//! Membership set of the room and the broadcast fan-out policy.
//!
//! A member is in the set if and only if its outbound queue is open: the set
//! owns the only sending half of every queue, so removing a member closes its
//! queue exactly once.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::mpsc::error::TrySendError;

use super::{
    entity::{Member, MemberInfo, Message},
    value_object::ConnectionId,
};

/// Why a member was evicted during a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// The outbound queue was full (the member's writer is not keeping up)
    QueueFull,
    /// The outbound pump had already gone away
    QueueClosed,
}

/// Result of one broadcast
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Number of members the message was enqueued to
    pub delivered: usize,
    /// Members removed because the message could not be enqueued
    pub evicted: Vec<(ConnectionId, EvictionReason)>,
}

/// The set of currently joined members
#[derive(Debug, Default)]
pub struct Membership {
    members: HashMap<ConnectionId, Member>,
}

impl Membership {
    /// Create an empty membership set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member.
    ///
    /// Joining twice with the same id replaces the earlier entry, closing its
    /// queue. Returns `true` if an entry was replaced.
    pub fn join(&mut self, member: Member) -> bool {
        self.members.insert(member.id, member).is_some()
    }

    /// Remove a member and close its queue. Returns `false` if it was absent.
    pub fn leave(&mut self, id: &ConnectionId) -> bool {
        self.members.remove(id).is_some()
    }

    /// Enqueue `message` to every member without waiting.
    ///
    /// Members whose queue cannot take the message are evicted on the spot.
    pub fn broadcast(&mut self, message: Arc<Message>) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();

        for member in self.members.values() {
            match member.try_deliver(Arc::clone(&message)) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    outcome.evicted.push((member.id, EvictionReason::QueueFull))
                }
                Err(TrySendError::Closed(_)) => {
                    outcome.evicted.push((member.id, EvictionReason::QueueClosed))
                }
            }
        }

        for (id, _) in &outcome.evicted {
            self.members.remove(id);
        }

        outcome
    }

    /// Whether `id` is currently joined
    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.contains_key(id)
    }

    /// Number of joined members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Snapshot of all members, oldest join first
    pub fn member_infos(&self) -> Vec<MemberInfo> {
        let mut infos: Vec<MemberInfo> = self.members.values().map(Member::to_info).collect();
        infos.sort_by_key(|info| info.joined_at);
        infos
    }
}
