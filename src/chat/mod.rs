//! Chat application module for interactive farming conversations.
//!
//! This module provides a streaming REPL chat interface built on top of the
//! agriagent client library. It supports:
//!
//! - Streaming replies with real-time token display
//! - Conversation history persisted across runs
//! - Crop photo diagnosis from the prompt
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`controller`]: Core session orchestration and persistence
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod controller;

pub use crate::render::ChatRenderer;
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use controller::{ChatBackend, ChatController, Phase};
