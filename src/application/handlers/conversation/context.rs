//! Per-request context handed to every conversation handler.
//!
//! Handlers never hold a logger of their own. They open a span from the
//! context they were given, so every log line of a request carries the
//! same correlation id.

use tracing::Span;
use uuid::Uuid;

/// Request-scoped context for command and query handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    correlation_id: String,
}

impl RequestContext {
    /// Creates a context bound to an existing correlation id (e.g. `x-request-id`).
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }

    /// Creates a context with a freshly generated correlation id.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Opens the logging span for one handler invocation.
    ///
    /// `conversation_id` starts empty and is recorded once it is known.
    pub fn span(&self, operation: &'static str) -> Span {
        tracing::info_span!(
            "conversation",
            operation = operation,
            correlation_id = %self.correlation_id,
            conversation_id = tracing::field::Empty,
        )
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_supplied_correlation_id() {
        let ctx = RequestContext::new("req-42");
        assert_eq!(ctx.correlation_id(), "req-42");
    }

    #[test]
    fn generated_contexts_differ() {
        assert_ne!(RequestContext::generate(), RequestContext::generate());
    }
}
