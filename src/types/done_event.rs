use serde::{Deserialize, Serialize};

/// Terminal event for a successful stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoneEvent {
    /// The definitive list of agents that produced the answer.
    #[serde(default)]
    pub agents_used: Vec<String>,

    /// Language the answer was produced in.
    pub language: String,
}

impl DoneEvent {
    /// Create a new `DoneEvent`.
    pub fn new(agents_used: Vec<String>, language: impl Into<String>) -> Self {
        Self {
            agents_used,
            language: language.into(),
        }
    }
}
