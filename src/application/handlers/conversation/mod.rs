//! Conversation command and query handlers.
//!
//! Handles sending messages, reading and finishing conversations, and listing
//! the conversation history. Handlers are stateless between calls: every piece
//! of state lives in the repository.

mod context;
mod errors;
mod finish_conversation;
mod get_conversation;
mod get_conversation_history;
mod send_message;

pub use context::RequestContext;
pub use errors::ConversationError;
pub use finish_conversation::{FinishConversationCommand, FinishConversationHandler};
pub use get_conversation::{GetConversationHandler, GetConversationQuery};
pub use get_conversation_history::GetConversationHistoryHandler;
pub use send_message::{SendMessageCommand, SendMessageHandler};

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::ConversationId;

/// Conversation id and its full message list, as returned by send and get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTranscript {
    pub conversation_id: ConversationId,
    pub messages: Vec<Message>,
}

impl From<Conversation> for ConversationTranscript {
    fn from(conversation: Conversation) -> Self {
        Self {
            conversation_id: conversation.id(),
            messages: conversation.messages().to_vec(),
        }
    }
}
