//! HTTP adapters - REST API implementations.

pub mod chat;
pub mod health;
pub mod middleware;
mod router;

pub use chat::{chat_routes, ChatHandlers};
pub use router::create_router;
