//! Conversation aggregate entity.
//!
//! A conversation is an append-only transcript of user and assistant turns
//! with a one-way lifecycle: active until it is finished, finished forever after.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::message::Message;
use crate::domain::foundation::{ConversationId, Timestamp};

/// Returned when finishing a conversation that is already finished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conversation {0} is already finished")]
pub struct AlreadyFinished(pub ConversationId);

/// Conversation aggregate.
///
/// # Invariants
///
/// - `messages` is only ever appended to
/// - `is_finished` goes from false to true at most once
/// - `finished_at` is `Some` iff `is_finished` is true
/// - `started_at` never changes after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    messages: Vec<Message>,
    is_finished: bool,
    started_at: Timestamp,
    finished_at: Option<Timestamp>,
    updated_at: Timestamp,
}

impl Conversation {
    /// Starts a new, unsaved conversation with no messages.
    pub fn start() -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            is_finished: false,
            started_at: now,
            finished_at: None,
            updated_at: now,
        }
    }

    /// Reconstitute a conversation from persistence (no validation).
    pub fn reconstitute(
        id: ConversationId,
        messages: Vec<Message>,
        is_finished: bool,
        started_at: Timestamp,
        finished_at: Option<Timestamp>,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            messages,
            is_finished,
            started_at,
            finished_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Content of the final message, if any.
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Timestamp> {
        self.finished_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a user turn and returns a reference to it.
    ///
    /// Finished conversations still accept messages; callers decide whether
    /// that is allowed.
    pub fn append_user_message(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::user(content))
    }

    /// Appends an assistant turn and returns a reference to it.
    pub fn append_assistant_message(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::assistant(content))
    }

    /// Marks the conversation as finished.
    ///
    /// # Errors
    ///
    /// - `AlreadyFinished` if the conversation was finished before
    pub fn finish(&mut self) -> Result<(), AlreadyFinished> {
        if self.is_finished {
            return Err(AlreadyFinished(self.id));
        }

        let now = Timestamp::now();
        self.is_finished = true;
        self.finished_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Records that the store has just persisted this conversation.
    pub fn touch(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn push(&mut self, message: Message) -> &Message {
        self.updated_at = message.timestamp;
        self.messages.push(message);
        // Just pushed, so the vector is non-empty.
        &self.messages[self.messages.len() - 1]
    }
}
