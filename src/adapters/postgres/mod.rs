//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresConversationRepository` - Conversations with their messages as JSONB

mod conversation_repository;

pub use conversation_repository::PostgresConversationRepository;
