use serde::{Deserialize, Serialize};

/// Terminal event for a stream the backend aborted with an application error.
///
/// This is data, not a transport failure: the stream delivered it intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEvent {
    /// Human-readable description of what went wrong server-side.
    pub message: String,
}

impl ErrorEvent {
    /// Create a new `ErrorEvent`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
