use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Timestamp;

/// A single direct message between two users.
///
/// Messages are immutable once created; a thread is the append-only sequence of
/// messages exchanged with one peer, in the order the server returns them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique identifier for the message.
    pub id: Uuid,

    /// ID of the user who sent the message.
    pub sender_id: Uuid,

    /// ID of the user the message was sent to.
    pub receiver_id: Uuid,

    /// The message content.
    pub content: String,

    /// Timestamp assigned by the server on creation.
    pub created_at: Timestamp,
}

/// Request body for `POST /messages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    /// The UUID of the user to send the message to.
    pub receiver_id: Uuid,

    /// The content of the message.
    pub content: String,
}

/// Response body for the unread-count endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCountResponse {
    /// Number of unread items for the current actor.
    pub count: u64,
}
