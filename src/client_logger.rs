//! Logging trait for AgriAgent client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`AgriAgent`] client.
//!
//! [`AgriAgent`]: crate::AgriAgent

use crate::{ChatResponse, ChatStreamEvent, DiagnosisResponse};

/// A trait for logging AgriAgent client operations.
///
/// Implement this trait to capture and record all API interactions,
/// including both non-streaming responses and individual streaming events.
///
/// # Example
///
/// ```rust,ignore
/// use agriagent::{ChatResponse, ChatStreamEvent, ClientLogger, DiagnosisResponse};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_response(&self, response: &ChatResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Response: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
///
///     fn log_stream_event(&self, event: &ChatStreamEvent) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Stream event: {}", serde_json::to_string(event).unwrap()).unwrap();
///     }
///
///     fn log_diagnosis(&self, response: &DiagnosisResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Diagnosis: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a complete response from a non-streaming `chat` call.
    fn log_response(&self, response: &ChatResponse);

    /// Log an individual streaming event.
    ///
    /// This method is called for each [`ChatStreamEvent`] dispatched during
    /// a streaming request, in dispatch order.
    fn log_stream_event(&self, event: &ChatStreamEvent);

    /// Log a diagnosis response.
    fn log_diagnosis(&self, response: &DiagnosisResponse);
}
