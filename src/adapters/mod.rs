//! Adapters - Implementations of ports for external systems.
//!
//! - `ai` - Completion clients (OpenAI, mock)
//! - `postgres` - PostgreSQL conversation store
//! - `memory` - In-memory conversation store
//! - `http` - axum REST surface

pub mod ai;
pub mod http;
pub mod memory;
pub mod postgres;
