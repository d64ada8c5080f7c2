//! In-memory conversation store for tests and local runs without PostgreSQL.
//!
//! Mirrors the ordering and upsert semantics of the PostgreSQL adapter so
//! handler and HTTP tests exercise the same contract.
//!
//! # Example
//!
//! ```ignore
//! let repo = Arc::new(InMemoryConversationRepository::new());
//! repo.save(&conversation).await?;
//!
//! // Assert in tests
//! assert_eq!(repo.len(), 1);
//! assert_eq!(repo.save_count(), 1);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::{ConversationRepository, RepositoryError};

/// Conversation store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
    saves: AtomicUsize,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given conversations.
    ///
    /// Seeding does not count towards [`save_count`](Self::save_count).
    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        let map = conversations.into_iter().map(|c| (c.id(), c)).collect();
        Self {
            conversations: RwLock::new(map),
            saves: AtomicUsize::new(0),
        }
    }

    // === Test Helpers ===

    /// Returns a stored conversation without going through the port.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations
            .read()
            .expect("InMemoryConversationRepository: lock poisoned")
            .get(&id)
            .cloned()
    }

    /// Number of stored conversations.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn len(&self) -> usize {
        self.conversations
            .read()
            .expect("InMemoryConversationRepository: lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(AtomicOrdering::SeqCst)
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Database("in-memory store lock poisoned".to_string())
    }
}

/// `finished_at` descending with unfinished last, then `started_at` descending.
fn recent_first(a: &Conversation, b: &Conversation) -> Ordering {
    let by_finished = match (a.finished_at(), b.finished_at()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_finished.then_with(|| b.started_at().cmp(&a.started_at()))
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_id(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let conversations = self.conversations.read().map_err(|_| Self::poisoned())?;
        Ok(conversations.get(&id).cloned())
    }

    async fn find_by_id_and_finished(
        &self,
        id: ConversationId,
        finished: bool,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let conversations = self.conversations.read().map_err(|_| Self::poisoned())?;
        Ok(conversations
            .get(&id)
            .filter(|c| c.is_finished() == finished)
            .cloned())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<Conversation>, RepositoryError> {
        let conversations = self.conversations.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<Conversation> = conversations.values().cloned().collect();
        all.sort_by(recent_first);
        all.truncate(limit);
        Ok(all)
    }

    async fn save(&self, conversation: &Conversation) -> Result<Conversation, RepositoryError> {
        let mut stored = conversation.clone();
        stored.touch(Timestamp::now());

        let mut conversations = self.conversations.write().map_err(|_| Self::poisoned())?;
        conversations.insert(stored.id(), stored.clone());
        self.saves.fetch_add(1, AtomicOrdering::SeqCst);

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn at(minutes_ago: i64) -> Timestamp {
        Timestamp::from_datetime(Utc::now() - Duration::minutes(minutes_ago))
    }

    fn conversation(started: i64, finished: Option<i64>) -> Conversation {
        Conversation::reconstitute(
            ConversationId::new(),
            Vec::new(),
            finished.is_some(),
            at(started),
            finished.map(at),
            at(started),
        )
    }

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let repo = InMemoryConversationRepository::new();
        let mut c = Conversation::start();
        c.append_user_message("Hi");

        let saved = repo.save(&c).await.unwrap();
        let found = repo.find_by_id(c.id()).await.unwrap().unwrap();

        assert_eq!(found, saved);
        assert_eq!(found.messages(), c.messages());
        assert!(!found.updated_at().is_before(&c.updated_at()));
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let repo = InMemoryConversationRepository::new();
        let mut c = Conversation::start();
        repo.save(&c).await.unwrap();

        c.append_user_message("again");
        repo.save(&c).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(c.id()).unwrap().message_count(), 1);
        assert_eq!(repo.save_count(), 2);
    }

    #[tokio::test]
    async fn find_by_id_and_finished_filters_on_flag() {
        let active = conversation(10, None);
        let done = conversation(10, Some(5));
        let repo =
            InMemoryConversationRepository::with_conversations(vec![active.clone(), done.clone()]);

        assert!(repo
            .find_by_id_and_finished(active.id(), false)
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_id_and_finished(active.id(), true)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_id_and_finished(done.id(), false)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_id_and_finished(ConversationId::new(), false)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn recent_orders_finished_desc_then_unfinished() {
        let old_finish = conversation(60, Some(50));
        let new_finish = conversation(40, Some(1));
        let open_old = conversation(30, None);
        let open_new = conversation(2, None);

        let repo = InMemoryConversationRepository::with_conversations(vec![
            open_old.clone(),
            old_finish.clone(),
            open_new.clone(),
            new_finish.clone(),
        ]);

        let ids: Vec<_> = repo
            .find_recent(10)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id())
            .collect();

        assert_eq!(
            ids,
            vec![new_finish.id(), old_finish.id(), open_new.id(), open_old.id()]
        );
    }

    #[tokio::test]
    async fn recent_respects_limit() {
        let conversations = (0..5).map(|i| conversation(i, None)).collect();
        let repo = InMemoryConversationRepository::with_conversations(conversations);

        assert_eq!(repo.find_recent(3).await.unwrap().len(), 3);
        assert_eq!(repo.save_count(), 0);
    }
}
