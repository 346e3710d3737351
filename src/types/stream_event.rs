use serde::{Deserialize, Serialize};

use crate::types::{DoneEvent, ErrorEvent, RoutingEvent, TokenEvent};

/// One decoded frame of a streaming chat response.
///
/// A well-formed stream is zero or one `Routing`, any number of `Token`s, and
/// exactly one terminal `Done` or `Error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ChatStreamEvent {
    /// Agents were selected to answer.
    #[serde(rename = "routing")]
    Routing(RoutingEvent),

    /// An incremental answer fragment.
    #[serde(rename = "token")]
    Token(TokenEvent),

    /// The stream finished successfully.
    #[serde(rename = "done")]
    Done(DoneEvent),

    /// The backend aborted the answer with an application error.
    #[serde(rename = "error")]
    Error(ErrorEvent),
}

impl ChatStreamEvent {
    /// Returns true for the events that end a stream (`Done` and `Error`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatStreamEvent::Done(_) | ChatStreamEvent::Error(_))
    }
}

impl From<RoutingEvent> for ChatStreamEvent {
    fn from(event: RoutingEvent) -> Self {
        ChatStreamEvent::Routing(event)
    }
}

impl From<TokenEvent> for ChatStreamEvent {
    fn from(event: TokenEvent) -> Self {
        ChatStreamEvent::Token(event)
    }
}

impl From<DoneEvent> for ChatStreamEvent {
    fn from(event: DoneEvent) -> Self {
        ChatStreamEvent::Done(event)
    }
}

impl From<ErrorEvent> for ChatStreamEvent {
    fn from(event: ErrorEvent) -> Self {
        ChatStreamEvent::Error(event)
    }
}
