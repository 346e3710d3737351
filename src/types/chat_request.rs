use serde::{Deserialize, Serialize};

/// Parameters for a chat request, streaming or not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,

    /// City to scope weather answers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Preferred answer language ("fr", "wo", "en").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Session identifier, for backend-side conversation continuity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Create a new `ChatRequest` with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Set the city for this request.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the language for this request.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the session id for this request.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl From<&str> for ChatRequest {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ChatRequest {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_request_omits_optional_fields() {
        let request = ChatRequest::new("Il pleut demain?");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Il pleut demain?"}));
    }

    #[test]
    fn full_request_serializes_all_fields() {
        let request = ChatRequest::new("Il pleut demain?")
            .with_city("kaolack")
            .with_language("fr")
            .with_session_id("abc-123");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Il pleut demain?",
                "city": "kaolack",
                "language": "fr",
                "session_id": "abc-123",
            })
        );
    }
}
