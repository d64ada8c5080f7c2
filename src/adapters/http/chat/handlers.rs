//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::adapters::http::middleware::RequestId;
use crate::application::handlers::conversation::{
    ConversationError, FinishConversationCommand, FinishConversationHandler,
    GetConversationHandler, GetConversationHistoryHandler, GetConversationQuery, RequestContext,
    SendMessageCommand, SendMessageHandler,
};
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::ports::{CompletionClient, ConversationRepository};

use super::dto::{
    ConversationResponse, ConversationSummaryResponse, ErrorResponse, SendMessageRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    send_handler: Arc<SendMessageHandler>,
    get_handler: Arc<GetConversationHandler>,
    finish_handler: Arc<FinishConversationHandler>,
    history_handler: Arc<GetConversationHistoryHandler>,
}

impl ChatHandlers {
    pub fn new(
        send_handler: Arc<SendMessageHandler>,
        get_handler: Arc<GetConversationHandler>,
        finish_handler: Arc<FinishConversationHandler>,
        history_handler: Arc<GetConversationHistoryHandler>,
    ) -> Self {
        Self {
            send_handler,
            get_handler,
            finish_handler,
            history_handler,
        }
    }

    /// Wires every handler to the same store and completion client.
    pub fn from_ports(
        repository: Arc<dyn ConversationRepository>,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self::new(
            Arc::new(SendMessageHandler::new(repository.clone(), completion_client)),
            Arc::new(GetConversationHandler::new(repository.clone())),
            Arc::new(FinishConversationHandler::new(repository.clone())),
            Arc::new(GetConversationHistoryHandler::new(repository)),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /chat - Send a message, optionally continuing a conversation
pub async fn send_message(
    State(handlers): State<ChatHandlers>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let ctx = request_context(request_id);

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(correlation_id = ctx.correlation_id(), error = %rejection, "Rejected chat request body");
            return bad_request(rejection.body_text());
        }
    };

    let conversation_id = match req.conversation_id.as_deref().map(parse_conversation_id) {
        None => None,
        Some(Ok(id)) => Some(id),
        Some(Err(response)) => return response,
    };

    let cmd = SendMessageCommand {
        message: req.message,
        conversation_id,
    };

    match handlers.send_handler.handle(cmd, &ctx).await {
        Ok(transcript) => {
            let response: ConversationResponse = transcript.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_conversation_error(e),
    }
}

/// GET /chat/conversation/history - List recent conversations
pub async fn get_conversation_history(
    State(handlers): State<ChatHandlers>,
    request_id: Option<Extension<RequestId>>,
) -> Response {
    let ctx = request_context(request_id);

    match handlers.history_handler.handle(&ctx).await {
        Ok(summaries) => {
            let response: Vec<ConversationSummaryResponse> =
                summaries.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_conversation_error(e),
    }
}

/// GET /chat/conversation/:id - Get a conversation transcript
pub async fn get_conversation(
    State(handlers): State<ChatHandlers>,
    request_id: Option<Extension<RequestId>>,
    Path(conversation_id): Path<String>,
) -> Response {
    let ctx = request_context(request_id);
    let conversation_id = match parse_conversation_id(&conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .get_handler
        .handle(GetConversationQuery { conversation_id }, &ctx)
        .await
    {
        Ok(transcript) => {
            let response: ConversationResponse = transcript.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_conversation_error(e),
    }
}

/// PUT /chat/conversation/:id/close - Finish a conversation
pub async fn finish_conversation(
    State(handlers): State<ChatHandlers>,
    request_id: Option<Extension<RequestId>>,
    Path(conversation_id): Path<String>,
) -> Response {
    let ctx = request_context(request_id);
    let conversation_id = match parse_conversation_id(&conversation_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .finish_handler
        .handle(FinishConversationCommand { conversation_id }, &ctx)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_conversation_error(e),
    }
}

fn request_context(request_id: Option<Extension<RequestId>>) -> RequestContext {
    match request_id {
        Some(Extension(RequestId(id))) => RequestContext::new(id),
        None => RequestContext::generate(),
    }
}

fn parse_conversation_id(raw: &str) -> Result<ConversationId, Response> {
    raw.parse::<ConversationId>().map_err(|e| {
        bad_request(ValidationError::invalid_format("conversationId", e.to_string()).to_string())
    })
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_conversation_error(error: ConversationError) -> Response {
    match error {
        ConversationError::NotFound(_) | ConversationError::NotFoundOrFinished(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(error.to_string())),
        )
            .into_response(),
        ConversationError::Validation(e) => bad_request(e.to_string()),
        ConversationError::Upstream(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(e.to_string())),
        )
            .into_response(),
        ConversationError::Repository(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal("Internal server error")),
        )
            .into_response(),
    }
}
