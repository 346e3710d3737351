use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Maximum number of characters of the first user message kept as a title.
const TITLE_MAX_CHARS: usize = 50;

/// Title given to conversations that have no user message yet.
const UNTITLED: &str = "New chat";

/// A saved conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Stable identifier for the conversation.
    pub id: String,

    /// Display title, derived from the first user message.
    pub title: String,

    /// Full transcript, oldest first.
    pub messages: Vec<Message>,

    /// Last-updated time, unix epoch milliseconds.
    pub timestamp: i64,
}

impl Session {
    /// Create a new `Session`, deriving the title from the messages.
    pub fn new(id: impl Into<String>, messages: Vec<Message>, timestamp: i64) -> Self {
        let title = Self::derive_title(&messages);
        Self {
            id: id.into(),
            title,
            messages,
            timestamp,
        }
    }

    /// Derive a display title: the first user message, truncated to 50
    /// characters with an ellipsis, or "New chat" when there is none.
    pub fn derive_title(messages: &[Message]) -> String {
        let Some(first_user) = messages.iter().find(|m| m.is_user()) else {
            return UNTITLED.to_string();
        };
        let content = first_user.content.trim();
        if content.is_empty() {
            return UNTITLED.to_string();
        }
        if content.chars().count() > TITLE_MAX_CHARS {
            let truncated: String = content.chars().take(TITLE_MAX_CHARS).collect();
            format!("{truncated}...")
        } else {
            content.to_string()
        }
    }
}
