//! Conversation domain module.
//!
//! Holds the conversation aggregate, its messages, and the summary
//! projection used by history listings.

mod aggregate;
mod message;
mod summary;

pub use aggregate::{AlreadyFinished, Conversation};
pub use message::{Message, MessageRole};
pub use summary::{ConversationSummary, HISTORY_LIMIT};
