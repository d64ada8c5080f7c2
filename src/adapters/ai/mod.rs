//! Completion client adapters.
//!
//! Implementations of the CompletionClient port.
//!
//! ## Available Adapters
//!
//! - `OpenAICompletionClient` - OpenAI chat completions API
//! - `MockCompletionClient` - Configurable mock for testing

mod mock_client;
mod openai_client;

pub use mock_client::{MockCompletionClient, DEFAULT_MOCK_REPLY};
pub use openai_client::{OpenAICompletionClient, OpenAIConfig};
