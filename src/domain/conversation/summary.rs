//! History summary projection.

use super::aggregate::Conversation;
use crate::domain::foundation::{ConversationId, Timestamp};

/// Maximum number of conversations returned by a history listing.
pub const HISTORY_LIMIT: usize = 20;

/// Reduced view of a conversation used for history listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub message_count: usize,
    /// Content of the final message, or empty when there are no messages.
    pub last_message: String,
}

impl From<&Conversation> for ConversationSummary {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id(),
            started_at: conversation.started_at(),
            finished_at: conversation.finished_at(),
            message_count: conversation.message_count(),
            last_message: conversation.last_message().unwrap_or_default().to_string(),
        }
    }
}
