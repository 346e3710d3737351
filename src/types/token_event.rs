use serde::{Deserialize, Serialize};

/// An incremental fragment of the assistant's answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenEvent {
    /// The text fragment. Appending fragments in arrival order reconstructs
    /// the full answer.
    pub text: String,
}

impl TokenEvent {
    /// Create a new `TokenEvent`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
