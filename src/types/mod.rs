// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod city;
pub mod diagnosis;
pub mod done_event;
pub mod error_event;
pub mod message;
pub mod routing_event;
pub mod session;
pub mod stream_event;
pub mod token_event;
pub mod weather;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::ChatResponse;
pub use city::CityInfo;
pub use diagnosis::{DiagnosisImage, DiagnosisResponse, ImageMediaType};
pub use done_event::DoneEvent;
pub use error_event::ErrorEvent;
pub use message::{Message, MessageRole};
pub use routing_event::RoutingEvent;
pub use session::Session;
pub use stream_event::ChatStreamEvent;
pub use token_event::TokenEvent;
pub use weather::{CurrentConditions, DailyForecast, WeatherReport, WeatherSummary};
