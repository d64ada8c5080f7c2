//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, validation errors)
//! - `conversation` - Conversation aggregate, messages, and history summaries

pub mod conversation;
pub mod foundation;
