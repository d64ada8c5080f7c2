//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversation;

pub use conversation::{
    // Context and errors
    ConversationError,
    ConversationTranscript,
    RequestContext,
    // Commands
    FinishConversationCommand,
    FinishConversationHandler,
    SendMessageCommand,
    SendMessageHandler,
    // Queries
    GetConversationHandler,
    GetConversationHistoryHandler,
    GetConversationQuery,
};
