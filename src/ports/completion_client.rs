//! Completion Client Port - Interface for the chat completion API.
//!
//! This port abstracts the external language model so that the conversation
//! handlers can request the next assistant turn without coupling to a provider.
//!
//! # Design
//!
//! - Non-streaming, single call per user turn
//! - Provider-agnostic role/content message projection
//! - A single opaque error: upstream detail is logged by the adapter, never returned
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoClient;
//!
//! #[async_trait]
//! impl CompletionClient for EchoClient {
//!     async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
//!         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Message, MessageRole};

/// Reply used when the upstream response carries no usable content.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response.";

/// Port for chat completion interactions.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate the next assistant reply for the given transcript.
    ///
    /// Implementations return [`FALLBACK_REPLY`] instead of failing when the
    /// provider answers without content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Role/content projection of a conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Creates a new chat message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Coarse classification of a completion failure, kept for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFailure {
    /// The call did not finish within the configured bound.
    Timeout,
    /// The request never produced an HTTP response.
    Transport,
    /// The provider answered with a non-success status.
    Upstream,
    /// The response body could not be decoded.
    Decode,
}

/// Opaque completion error.
///
/// The display text is identical for every failure kind so that no upstream
/// detail reaches API callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal error while processing message")]
pub struct CompletionError {
    kind: CompletionFailure,
}

impl CompletionError {
    pub fn new(kind: CompletionFailure) -> Self {
        Self { kind }
    }

    pub fn timeout() -> Self {
        Self::new(CompletionFailure::Timeout)
    }

    pub fn transport() -> Self {
        Self::new(CompletionFailure::Transport)
    }

    pub fn upstream() -> Self {
        Self::new(CompletionFailure::Upstream)
    }

    pub fn decode() -> Self {
        Self::new(CompletionFailure::Decode)
    }

    pub fn kind(&self) -> CompletionFailure {
        self.kind
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == CompletionFailure::Timeout
    }
}
