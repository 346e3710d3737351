//! Client library for the AgriAgent farming assistant.
//!
//! Provides a streaming chat client for the AgriAgent backend, conversation
//! state and session persistence, and the `agriagent-chat` terminal
//! application built on top of them.

// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod conversation;
pub mod error;
pub mod history;
pub mod lang;
pub mod observability;
pub mod render;
pub mod sse;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{AgriAgent, StreamHandler, dispatch_stream};
pub use client_logger::ClientLogger;
pub use conversation::ConversationState;
pub use error::{Error, Result};
pub use history::{FileSessionStore, MAX_SESSIONS, MemorySessionStore, SessionStore};
pub use lang::Language;
pub use observability::register_biometrics;
pub use types::*;
