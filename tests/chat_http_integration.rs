//! Integration tests for chat HTTP endpoints.
//!
//! These tests drive the full router (middleware included) against the
//! in-memory conversation store and the mock completion client.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use chat_relay::adapters::ai::{MockCompletionClient, DEFAULT_MOCK_REPLY};
use chat_relay::adapters::http::{create_router, ChatHandlers};
use chat_relay::adapters::memory::InMemoryConversationRepository;
use chat_relay::config::ServerConfig;
use chat_relay::domain::conversation::Conversation;
use chat_relay::domain::foundation::ConversationId;
use chat_relay::ports::{CompletionError, FALLBACK_REPLY};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    repository: Arc<InMemoryConversationRepository>,
    client: Arc<MockCompletionClient>,
}

impl TestApp {
    fn new() -> Self {
        Self::with(InMemoryConversationRepository::new(), MockCompletionClient::new())
    }

    fn with(repository: InMemoryConversationRepository, client: MockCompletionClient) -> Self {
        Self::with_config(repository, client, ServerConfig::default())
    }

    fn with_config(
        repository: InMemoryConversationRepository,
        client: MockCompletionClient,
        config: ServerConfig,
    ) -> Self {
        let repository = Arc::new(repository);
        let client = Arc::new(client);
        let handlers = ChatHandlers::from_ports(repository.clone(), client.clone());
        let router = create_router(handlers, &config);
        Self {
            router,
            repository,
            client,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, body.map(|b| b.to_string())).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                builder = builder.header("content-type", "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }
}

fn stored_conversation(contents: &[(&str, &str)]) -> Conversation {
    let mut conversation = Conversation::start();
    for (user, assistant) in contents {
        conversation.append_user_message(*user);
        conversation.append_assistant_message(*assistant);
    }
    conversation
}

// =============================================================================
// POST /chat
// =============================================================================

#[tokio::test]
async fn send_without_id_creates_conversation() {
    let app = TestApp::with(
        InMemoryConversationRepository::new(),
        MockCompletionClient::new().with_response("Hi! How can I help?"),
    );

    let (status, body) = app
        .send(Method::POST, "/chat", Some(json!({"message": "Hello"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Hello");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Hi! How can I help?");

    let id: ConversationId = body["conversationId"].as_str().unwrap().parse().unwrap();
    assert!(app.repository.get(id).is_some());
    assert_eq!(app.repository.len(), 1);
}

#[tokio::test]
async fn send_with_id_appends_to_conversation() {
    let existing = stored_conversation(&[("First", "Reply")]);
    let id = existing.id();
    let app = TestApp::with(
        InMemoryConversationRepository::with_conversations(vec![existing]),
        MockCompletionClient::new(),
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/chat",
            Some(json!({"message": "Second", "conversationId": id.to_string()})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversationId"], id.to_string());
    let contents: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["First", "Reply", "Second", DEFAULT_MOCK_REPLY]);
}

#[tokio::test]
async fn send_with_unknown_id_returns_404() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/chat",
            Some(json!({"message": "Hello", "conversationId": ConversationId::new().to_string()})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(app.client.call_count(), 0);
    assert!(app.repository.is_empty());
}

#[tokio::test]
async fn send_with_malformed_id_returns_400() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/chat",
            Some(json!({"message": "Hello", "conversationId": "abc"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.client.call_count(), 0);
}

#[tokio::test]
async fn send_with_empty_or_missing_message_returns_400() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/chat", Some(json!({"message": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = app.send(Method::POST, "/chat", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.client.call_count(), 0);
    assert!(app.repository.is_empty());
}

#[tokio::test]
async fn send_with_whitespace_message_is_relayed() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/chat", Some(json!({"message": "   "})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["content"], "   ");
    assert_eq!(app.client.call_count(), 1);
    assert_eq!(app.repository.len(), 1);
}

#[tokio::test]
async fn send_with_malformed_json_returns_400() {
    let app = TestApp::new();

    let (status, bytes) = app
        .send_raw(Method::POST, "/chat", Some("{not json".to_string()))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn completion_failure_returns_generic_500_and_stores_nothing() {
    let app = TestApp::with(
        InMemoryConversationRepository::new(),
        MockCompletionClient::new().with_error(CompletionError::upstream()),
    );

    let (status, body) = app
        .send(Method::POST, "/chat", Some(json!({"message": "Hello"})))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["message"], "internal error while processing message");
    assert!(app.repository.is_empty());
}

#[tokio::test]
async fn fallback_reply_is_returned_as_assistant_message() {
    let app = TestApp::with(
        InMemoryConversationRepository::new(),
        MockCompletionClient::new().with_response(FALLBACK_REPLY),
    );

    let (status, body) = app
        .send(Method::POST, "/chat", Some(json!({"message": "Hello"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][1]["content"], FALLBACK_REPLY);
}

// =============================================================================
// GET /chat/conversation/:id
// =============================================================================

#[tokio::test]
async fn get_conversation_returns_messages() {
    let existing = stored_conversation(&[("Hi", "Hello!")]);
    let id = existing.id();
    let app = TestApp::with(
        InMemoryConversationRepository::with_conversations(vec![existing]),
        MockCompletionClient::new(),
    );

    let (status, body) = app
        .send(Method::GET, &format!("/chat/conversation/{}", id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversationId"], id.to_string());
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][1]["role"], "assistant");
}

#[tokio::test]
async fn get_unknown_conversation_returns_404() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/chat/conversation/{}", ConversationId::new()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn get_with_malformed_id_returns_400() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::GET, "/chat/conversation/not-a-uuid", None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

// =============================================================================
// PUT /chat/conversation/:id/close
// =============================================================================

#[tokio::test]
async fn close_returns_204_then_404() {
    let existing = stored_conversation(&[("Hi", "Hello!")]);
    let id = existing.id();
    let app = TestApp::with(
        InMemoryConversationRepository::with_conversations(vec![existing]),
        MockCompletionClient::new(),
    );
    let uri = format!("/chat/conversation/{}/close", id);

    let (status, bytes) = app.send_raw(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());

    let stored = app.repository.get(id).unwrap();
    assert!(stored.is_finished());
    assert!(stored.finished_at().is_some());

    let (status, body) = app.send(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn close_unknown_conversation_returns_404() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/chat/conversation/{}/close", ConversationId::new()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn close_with_malformed_id_returns_400() {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::PUT, "/chat/conversation/123/close", None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// GET /chat/conversation/history
// =============================================================================

#[tokio::test]
async fn history_is_empty_initially() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::GET, "/chat/conversation/history", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn history_summarizes_and_caps_at_twenty() {
    let mut conversations: Vec<Conversation> = (0..24)
        .map(|i| stored_conversation(&[("question", &*format!("answer {}", i))]))
        .collect();
    let mut finished = stored_conversation(&[("bye", "goodbye")]);
    finished.finish().unwrap();
    let finished_id = finished.id();
    conversations.push(finished);

    let app = TestApp::with(
        InMemoryConversationRepository::with_conversations(conversations),
        MockCompletionClient::new(),
    );

    let (status, body) = app
        .send(Method::GET, "/chat/conversation/history", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 20);

    // The only finished conversation sorts first.
    assert_eq!(items[0]["id"], finished_id.to_string());
    assert_eq!(items[0]["messageCount"], 2);
    assert_eq!(items[0]["lastMessage"], "goodbye");
    assert!(items[0]["finishedAt"].is_string());
    assert!(items[1]["finishedAt"].is_null());
}

#[tokio::test]
async fn history_reports_blank_last_message_for_empty_conversation() {
    let app = TestApp::with(
        InMemoryConversationRepository::with_conversations(vec![Conversation::start()]),
        MockCompletionClient::new(),
    );

    let (_, body) = app
        .send(Method::GET, "/chat/conversation/history", None)
        .await;

    assert_eq!(body[0]["messageCount"], 0);
    assert_eq!(body[0]["lastMessage"], "");
}

// =============================================================================
// Ambient surface
// =============================================================================

#[tokio::test]
async fn health_reports_healthy() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn request_timeout_returns_408_with_request_id() {
    let config = ServerConfig {
        request_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let app = TestApp::with_config(
        InMemoryConversationRepository::new(),
        MockCompletionClient::new().with_delay(Duration::from_secs(3)),
        config,
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/chat")
                .header("content-type", "application/json")
                .header("x-request-id", "slow-1")
                .body(Body::from(json!({"message": "Hi"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.headers()["x-request-id"], "slow-1");
    assert!(app.repository.is_empty());
}

#[tokio::test]
async fn finished_conversation_accepts_new_messages() {
    let mut existing = stored_conversation(&[("Hi", "Hello!")]);
    existing.finish().unwrap();
    let id = existing.id();
    let app = TestApp::with(
        InMemoryConversationRepository::with_conversations(vec![existing]),
        MockCompletionClient::new(),
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/chat",
            Some(json!({"message": "Back again", "conversationId": id.to_string()})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 4);
}
