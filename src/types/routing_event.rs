use serde::{Deserialize, Serialize};

/// Announces which agents were selected to answer, before any tokens arrive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingEvent {
    /// The selected agents, in routing order.
    pub agents: Vec<String>,
}

impl RoutingEvent {
    /// Create a new `RoutingEvent`.
    pub fn new(agents: Vec<String>) -> Self {
        Self { agents }
    }
}
