//! Application router.

use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::chat::{chat_routes, ChatHandlers};
use super::health::health_handler;
use super::middleware::request_id_middleware;
use crate::config::ServerConfig;

/// Builds the full HTTP surface with its middleware stack.
pub fn create_router(handlers: ChatHandlers, config: &ServerConfig) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .merge(chat_routes(handlers))
        .layer(trace_layer)
        .layer(TimeoutLayer::new(config.request_timeout()))
        // Outside trace and timeout so the trace span nests under the request
        // span and a 408 still carries the request id.
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&config.cors_origins_list()))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(allowed))
    }
}
