//! GetConversationHistoryHandler - Query handler for the recent-conversation listing.

use std::sync::Arc;

use tracing::Instrument;

use super::{ConversationError, RequestContext};
use crate::domain::conversation::{ConversationSummary, HISTORY_LIMIT};
use crate::ports::ConversationRepository;

/// Handler for listing conversation history.
pub struct GetConversationHistoryHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl GetConversationHistoryHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    /// Returns summaries of at most [`HISTORY_LIMIT`] conversations, most
    /// recently finished first and never-finished ones last.
    pub async fn handle(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<ConversationSummary>, ConversationError> {
        async {
            let result = self
                .repository
                .find_recent(HISTORY_LIMIT)
                .await
                .map(|conversations| {
                    conversations
                        .iter()
                        .take(HISTORY_LIMIT)
                        .map(ConversationSummary::from)
                        .collect::<Vec<_>>()
                })
                .map_err(ConversationError::from);

            match result {
                Ok(ref summaries) => {
                    tracing::info!(count = summaries.len(), "Conversation history loaded")
                }
                Err(ref e) => e.log(),
            }
            result
        }
        .instrument(ctx.span("get_conversation_history"))
        .await
    }
}
