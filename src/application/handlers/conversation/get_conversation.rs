//! GetConversationHandler - Query handler for retrieving a conversation transcript.

use std::sync::Arc;

use tracing::Instrument;

use super::{ConversationError, ConversationTranscript, RequestContext};
use crate::domain::foundation::ConversationId;
use crate::ports::ConversationRepository;

/// Query to get a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

/// Handler for getting conversations.
pub struct GetConversationHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl GetConversationHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetConversationQuery,
        ctx: &RequestContext,
    ) -> Result<ConversationTranscript, ConversationError> {
        let id = query.conversation_id;
        let span = ctx.span("get_conversation");
        span.record("conversation_id", tracing::field::display(id));

        async {
            let result = match self.repository.find_by_id(id).await {
                Ok(Some(conversation)) => {
                    tracing::info!(
                        message_count = conversation.message_count(),
                        "Conversation found"
                    );
                    Ok(ConversationTranscript::from(conversation))
                }
                Ok(None) => Err(ConversationError::NotFound(id)),
                Err(e) => Err(e.into()),
            };
            if let Err(ref e) = result {
                e.log();
            }
            result
        }
        .instrument(span)
        .await
    }
}
