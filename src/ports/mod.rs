//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationRepository` - Conversation persistence
//! - `CompletionClient` - Chat completion API

mod completion_client;
mod conversation_repository;

pub use completion_client::{
    ChatMessage, CompletionClient, CompletionError, CompletionFailure, FALLBACK_REPLY,
};
pub use conversation_repository::{ConversationRepository, RepositoryError};
