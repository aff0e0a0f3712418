use serde::{Deserialize, Serialize};

use super::{Message, UserSummary};

/// Summary of a direct-message conversation with one peer.
///
/// Identity is `peer.id`. The server owns the ordering of the conversation list;
/// clients replace the whole list on refetch rather than merging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// The other participant in the conversation.
    pub peer: UserSummary,

    /// The most recent message exchanged, when any exist.
    pub last_message: Option<Message>,

    /// Number of messages from the peer the actor has not read yet.
    pub unread_count: u32,
}
