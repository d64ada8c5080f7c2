//! FinishConversationHandler - Command handler for closing a conversation.

use std::sync::Arc;

use tracing::Instrument;

use super::{ConversationError, RequestContext};
use crate::domain::foundation::ConversationId;
use crate::ports::ConversationRepository;

/// Command to finish an active conversation.
#[derive(Debug, Clone)]
pub struct FinishConversationCommand {
    pub conversation_id: ConversationId,
}

/// Handler for finishing conversations.
pub struct FinishConversationHandler {
    repository: Arc<dyn ConversationRepository>,
}

impl FinishConversationHandler {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: FinishConversationCommand,
        ctx: &RequestContext,
    ) -> Result<(), ConversationError> {
        let id = cmd.conversation_id;
        let span = ctx.span("finish_conversation");
        span.record("conversation_id", tracing::field::display(id));

        async {
            let result = self.execute(id).await;
            if let Err(ref e) = result {
                e.log();
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, id: ConversationId) -> Result<(), ConversationError> {
        // 1. Load only if still active
        let mut conversation = self
            .repository
            .find_by_id_and_finished(id, false)
            .await?
            .ok_or(ConversationError::NotFoundOrFinished(id))?;

        // 2. Finish
        conversation
            .finish()
            .map_err(|_| ConversationError::NotFoundOrFinished(id))?;

        // 3. Persist
        self.repository.save(&conversation).await?;
        tracing::info!("Conversation finished");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationRepository;
    use crate::domain::conversation::Conversation;

    fn command(id: ConversationId) -> FinishConversationCommand {
        FinishConversationCommand {
            conversation_id: id,
        }
    }

    #[tokio::test]
    async fn finishes_active_conversation() {
        let conversation = Conversation::start();
        let id = conversation.id();
        let repo = Arc::new(InMemoryConversationRepository::with_conversations(vec![
            conversation,
        ]));
        let handler = FinishConversationHandler::new(repo.clone());

        handler
            .handle(command(id), &RequestContext::generate())
            .await
            .unwrap();

        let stored = repo.get(id).unwrap();
        assert!(stored.is_finished());
        assert!(stored.finished_at().is_some());
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn second_finish_fails_with_not_found() {
        let conversation = Conversation::start();
        let id = conversation.id();
        let repo = Arc::new(InMemoryConversationRepository::with_conversations(vec![
            conversation,
        ]));
        let handler = FinishConversationHandler::new(repo.clone());
        let ctx = RequestContext::generate();

        handler.handle(command(id), &ctx).await.unwrap();
        let first_finished_at = repo.get(id).unwrap().finished_at();

        let result = handler.handle(command(id), &ctx).await;
        assert!(matches!(result, Err(ConversationError::NotFoundOrFinished(e)) if e == id));
        assert_eq!(repo.get(id).unwrap().finished_at(), first_finished_at);
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn unknown_id_fails_with_not_found() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let handler = FinishConversationHandler::new(repo.clone());

        let result = handler
            .handle(command(ConversationId::new()), &RequestContext::generate())
            .await;

        assert!(matches!(result, Err(ConversationError::NotFoundOrFinished(_))));
        assert_eq!(repo.save_count(), 0);
    }
}
