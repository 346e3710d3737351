//! In-memory conversation transcript.
//!
//! A conversation is an ordered list of messages where at most one assistant
//! message, always the last one, is "pending": created empty when an exchange
//! starts and filled in as events arrive. All streaming mutations target that
//! pending message and become no-ops once a terminal mutation releases it.

use crate::types::{Message, MessageRole};

/// Ordered message history for one conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    messages: Vec<Message>,
    pending: bool,
}

impl ConversationState {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether an assistant message is currently awaiting its answer.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the conversation has no messages at all.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a user message. The caller must have released any pending
    /// assistant message first.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Append a user message carrying an attached image.
    pub fn push_user_with_image(&mut self, text: impl Into<String>, image_ref: impl Into<String>) {
        self.messages.push(Message::user_with_image(text, image_ref));
    }

    /// Append an empty assistant message and mark it pending. No-op if a
    /// pending message already exists.
    pub fn begin_assistant(&mut self) {
        if self.pending {
            return;
        }
        self.messages.push(Message::assistant(String::new()));
        self.pending = true;
    }

    /// Record which agents were routed to answer. Only applies while the
    /// pending message has no content yet; routing never clobbers an answer
    /// already in progress.
    pub fn apply_routing(&mut self, agents: &[String]) {
        if let Some(message) = self.pending_message() {
            if message.content.is_empty() {
                message.agents_used = agents.to_vec();
            }
        }
    }

    /// Append an answer fragment to the pending message.
    pub fn append_token(&mut self, fragment: &str) {
        if let Some(message) = self.pending_message() {
            message.content.push_str(fragment);
        }
    }

    /// Complete the pending message: the terminal agent list replaces
    /// whatever routing recorded, the language is stamped, and the message
    /// stops being pending.
    pub fn finalize(&mut self, agents_used: &[String], language: &str) {
        if let Some(message) = self.pending_message() {
            message.agents_used = agents_used.to_vec();
            message.language = Some(language.to_string());
            self.pending = false;
        }
    }

    /// Fail the pending message: its content is replaced by `text` and the
    /// transient routing attribution is dropped.
    pub fn fail(&mut self, text: impl Into<String>) {
        if let Some(message) = self.pending_message() {
            message.content = text.into();
            message.agents_used.clear();
            self.pending = false;
        }
    }

    /// Release a pending message whose stream ended without a terminal
    /// event. Accumulated content stays; unconfirmed routing attribution is
    /// dropped.
    pub fn close_pending(&mut self) {
        if let Some(message) = self.pending_message() {
            message.agents_used.clear();
            self.pending = false;
        }
    }

    /// Replace the whole transcript, e.g. when restoring a saved session.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.pending = false;
    }

    /// Drop all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending = false;
    }

    fn pending_message(&mut self) -> Option<&mut Message> {
        if !self.pending {
            return None;
        }
        self.messages
            .last_mut()
            .filter(|m| m.role == MessageRole::Assistant)
    }
}
