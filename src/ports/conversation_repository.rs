//! Conversation repository port.
//!
//! Defines the contract for persisting and retrieving Conversation aggregates.
//! Implementations handle the actual storage.
//!
//! # Design
//!
//! - **Aggregate-oriented**: a conversation is loaded and saved whole
//! - **Message ownership**: messages live inside their conversation record
//! - **No locking**: concurrent saves of the same conversation are last-write-wins
//!
//! New conversations are created with [`Conversation::start`] and only reach the
//! store through [`ConversationRepository::save`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;

/// Errors raised by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository port for Conversation aggregate persistence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find a conversation by its ID, regardless of lifecycle state.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: ConversationId)
        -> Result<Option<Conversation>, RepositoryError>;

    /// Find a conversation by ID only if its finished flag matches `finished`.
    ///
    /// Returns `None` both when the ID is unknown and when the flag differs.
    async fn find_by_id_and_finished(
        &self,
        id: ConversationId,
        finished: bool,
    ) -> Result<Option<Conversation>, RepositoryError>;

    /// Return up to `limit` conversations ordered by `finished_at` descending.
    ///
    /// Conversations that were never finished sort after all finished ones;
    /// ties are broken by `started_at` descending.
    async fn find_recent(&self, limit: usize) -> Result<Vec<Conversation>, RepositoryError>;

    /// Insert or replace a conversation.
    ///
    /// Returns the persisted record with `updated_at` refreshed by the store.
    async fn save(&self, conversation: &Conversation) -> Result<Conversation, RepositoryError>;
}
