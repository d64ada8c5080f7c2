//! SendMessageHandler - Command handler for relaying a user message.
//!
//! Loads or starts a conversation, appends the user turn, asks the completion
//! client for the assistant turn, and persists the result in a single write.
//! Nothing is written when the completion call fails.

use std::sync::Arc;

use tracing::Instrument;

use super::{ConversationError, ConversationTranscript, RequestContext};
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::ports::{ChatMessage, CompletionClient, ConversationRepository};

/// Command to send a message, optionally continuing an existing conversation.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub message: String,
    pub conversation_id: Option<ConversationId>,
}

impl SendMessageCommand {
    /// Starts a new conversation with this message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
        }
    }

    /// Continues the given conversation.
    pub fn in_conversation(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }
}

/// Handler for sending messages.
pub struct SendMessageHandler {
    repository: Arc<dyn ConversationRepository>,
    completion_client: Arc<dyn CompletionClient>,
}

impl SendMessageHandler {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            repository,
            completion_client,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendMessageCommand,
        ctx: &RequestContext,
    ) -> Result<ConversationTranscript, ConversationError> {
        let span = ctx.span("send_message");
        async {
            let result = self.execute(cmd).await;
            if let Err(ref e) = result {
                e.log();
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<ConversationTranscript, ConversationError> {
        if cmd.message.is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }

        // 1. Load or start
        let mut conversation = match cmd.conversation_id {
            Some(id) => {
                tracing::Span::current().record("conversation_id", tracing::field::display(id));
                let existing = self
                    .repository
                    .find_by_id(id)
                    .await?
                    .ok_or(ConversationError::NotFound(id))?;
                tracing::info!(
                    message_count = existing.message_count(),
                    "Continuing existing conversation"
                );
                existing
            }
            None => {
                let started = Conversation::start();
                tracing::Span::current()
                    .record("conversation_id", tracing::field::display(started.id()));
                tracing::info!("Starting new conversation");
                started
            }
        };

        // 2. Append user turn
        conversation.append_user_message(cmd.message);

        // 3. Ask for the assistant turn
        let transcript: Vec<ChatMessage> =
            conversation.messages().iter().map(ChatMessage::from).collect();
        tracing::info!(message_count = transcript.len(), "Requesting completion");
        let reply = self.completion_client.complete(&transcript).await?;

        // 4. Append assistant turn
        conversation.append_assistant_message(reply);

        // 5. Persist
        let saved = self.repository.save(&conversation).await?;
        tracing::info!(message_count = saved.message_count(), "Conversation saved");

        Ok(ConversationTranscript::from(saved))
    }
}
