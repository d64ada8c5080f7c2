//! Errors shared by the conversation handlers.

use thiserror::Error;

use crate::domain::foundation::{ConversationId, ValidationError};
use crate::ports::{CompletionError, RepositoryError};

/// Errors returned by conversation command and query handlers.
#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    /// No conversation exists with this ID.
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    /// No active conversation exists with this ID. Unknown and finished
    /// conversations are reported the same way.
    #[error("Conversation not found or already finished: {0}")]
    NotFoundOrFinished(ConversationId),

    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The completion call failed or timed out. Carried as-is from the client.
    #[error(transparent)]
    Upstream(#[from] CompletionError),

    /// The store failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ConversationError {
    /// Logs the error inside the current handler span.
    pub(crate) fn log(&self) {
        match self {
            ConversationError::NotFound(_) | ConversationError::NotFoundOrFinished(_) => {
                tracing::warn!(error = %self, "Conversation lookup failed");
            }
            ConversationError::Validation(_) => {
                tracing::warn!(error = %self, "Rejected invalid input");
            }
            ConversationError::Upstream(e) => {
                tracing::error!(
                    error = %self,
                    kind = ?e.kind(),
                    timed_out = e.is_timeout(),
                    "Completion call failed"
                );
            }
            ConversationError::Repository(_) => {
                tracing::error!(error = %self, "Conversation store failed");
            }
        }
    }
}
