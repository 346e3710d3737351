use serde::{Deserialize, Serialize};

/// A complete, non-streaming chat answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    /// The assistant's full answer.
    pub response: String,

    /// Language the answer was produced in.
    pub language: String,

    /// Agents that contributed to the answer.
    #[serde(default)]
    pub agents_used: Vec<String>,

    /// Free-form metadata attached by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}
