use serde::{Deserialize, Serialize};

/// A single entry in a conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// The role of the message.
    pub role: MessageRole,

    /// The text content of the message.
    pub content: String,

    /// Agents that contributed to this message. Empty for user messages and
    /// for assistant messages that have not been attributed yet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents_used: Vec<String>,

    /// Language tag the backend answered in ("fr", "wo", "en").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Data URL of an attached image, for photo-diagnosis turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

/// Role type for a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl Message {
    /// Create a new `Message` with the given role and content.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            agents_used: Vec::new(),
            language: None,
            image_ref: None,
        }
    }

    /// Create a new user `Message`.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create a new user `Message` carrying an attached image.
    pub fn user_with_image(content: impl Into<String>, image_ref: impl Into<String>) -> Self {
        let mut message = Self::new(MessageRole::User, content);
        message.image_ref = Some(image_ref.into());
        message
    }

    /// Create a new assistant `Message`.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Returns true if this is a user message.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Returns true if this is an assistant message.
    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

impl From<&str> for Message {
    fn from(content: &str) -> Self {
        Self::user(content)
    }
}

impl From<String> for Message {
    fn from(content: String) -> Self {
        Self::user(content)
    }
}
