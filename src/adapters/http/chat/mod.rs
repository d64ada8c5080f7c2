//! HTTP adapter for chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ConversationResponse, ConversationSummaryResponse, ErrorResponse, MessageResponse,
    SendMessageRequest,
};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
