//! HTTP API response DTOs for the chat relay.

use serde::{Deserialize, Serialize};

use crate::usecase::RoomSnapshot;

/// Room state for the room endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomStateDto {
    pub created_at: String, // ISO 8601
    pub participants: Vec<ParticipantDto>,
}

/// Participant entry of the room state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub connection_id: String,
    pub name: Option<String>,
    pub joined_at: String, // ISO 8601
}

impl From<&RoomSnapshot> for RoomStateDto {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            created_at: snapshot.created_at.to_rfc3339(),
            participants: snapshot
                .members
                .iter()
                .map(|member| ParticipantDto {
                    connection_id: member.id.to_string(),
                    name: member.name.as_ref().map(|n| n.as_str().to_string()),
                    joined_at: member.joined_at.to_rfc3339(),
                })
                .collect(),
        }
    }
}
