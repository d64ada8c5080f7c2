//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types. Field names are
//! camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::application::ConversationTranscript;
use crate::domain::conversation::{ConversationSummary, Message, MessageRole};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to send a message.
///
/// `conversation_id` is kept as a string so a malformed id can be reported
/// as a validation failure rather than a body decoding failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A single message of a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            role: message.role,
            content: message.content,
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}

/// Conversation id with its full message list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub messages: Vec<MessageResponse>,
}

impl From<ConversationTranscript> for ConversationResponse {
    fn from(transcript: ConversationTranscript) -> Self {
        Self {
            conversation_id: transcript.conversation_id.to_string(),
            messages: transcript.messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// One entry of the conversation history listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryResponse {
    pub id: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub message_count: usize,
    pub last_message: String,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            started_at: summary.started_at.to_rfc3339(),
            finished_at: summary.finished_at.map(|t| t.to_rfc3339()),
            message_count: summary.message_count,
            last_message: summary.last_message,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
