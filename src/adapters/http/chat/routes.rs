//! HTTP routes for chat endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    finish_conversation, get_conversation, get_conversation_history, send_message, ChatHandlers,
};

/// Creates the chat router with all endpoints.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/chat", post(send_message))
        .route("/chat/conversation/history", get(get_conversation_history))
        .route("/chat/conversation/:id", get(get_conversation))
        .route("/chat/conversation/:id/close", put(finish_conversation))
        .with_state(handlers)
}
