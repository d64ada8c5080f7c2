//! Chat Relay - Conversation persistence and relay for a chat completion API
//!
//! Stores user/assistant conversations and forwards each new user turn,
//! together with the conversation so far, to an external completion API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
