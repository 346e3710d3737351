use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use futures::stream::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::sse::process_sse;
use crate::types::{
    ChatRequest, ChatResponse, ChatStreamEvent, CityInfo, DiagnosisImage, DiagnosisResponse,
    WeatherReport,
};

const DEFAULT_API_URL: &str = "http://localhost:8095/api";

/// Receives the events of one streaming chat exchange, in dispatch order.
///
/// `on_routing` fires at most once, before any token. `on_token` fires once
/// per fragment. Exactly one of `on_done` or `on_error` ends a well-formed
/// stream. `should_interrupt` is polled between events; returning true stops
/// the exchange and closes the transport.
pub trait StreamHandler: Send {
    /// Agents were selected to answer.
    fn on_routing(&mut self, agents: &[String]);

    /// An incremental fragment of the answer arrived.
    fn on_token(&mut self, text: &str);

    /// The stream finished successfully.
    fn on_done(&mut self, agents_used: &[String], language: &str);

    /// The backend reported an application error for this exchange.
    fn on_error(&mut self, message: &str);

    /// Whether the exchange should stop before the next event.
    fn should_interrupt(&self) -> bool {
        false
    }
}

/// Client for the AgriAgent API.
#[derive(Clone)]
pub struct AgriAgent {
    client: ReqwestClient,
    base_url: String,
    timeout: Option<Duration>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl AgriAgent {
    /// Create a new AgriAgent client with default settings.
    ///
    /// No request timeout is applied by default; use [`AgriAgent::with_options`]
    /// to set one.
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// `timeout` bounds each whole request, including reading a streaming
    /// body. Leave it `None` for long-lived streams.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {e}"),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Install a logger that sees every API interaction.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Convert a reqwest transport failure to our Error type.
    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        CLIENT_REQUEST_ERRORS.click();
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {e}"),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // FastAPI reports errors as {"detail": "..."}
        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or(error_body);

        Error::api(status_code, message)
    }

    /// Send a chat message and get the complete answer in one response.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat", self.base_url);
        CLIENT_REQUESTS.click();

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        let response = response.json::<ChatResponse>().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::serialization(format!("Failed to parse response: {e}"), Some(Box::new(e)))
        })?;

        if let Some(logger) = &self.logger {
            logger.log_response(&response);
        }
        Ok(response)
    }

    /// Send a chat message and get a streaming response.
    ///
    /// Returns a lazy stream of [`ChatStreamEvent`]s. Opening the request
    /// fails with `Err`; a transport fault mid-stream surfaces as an `Err`
    /// item in the stream.
    pub async fn chat_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<impl Stream<Item = Result<ChatStreamEvent>>> {
        let url = format!("{}/chat/stream", self.base_url);
        CLIENT_REQUESTS.click();

        let mut headers = self.default_headers();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/event-stream"));

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        Ok(process_sse(response.bytes_stream()))
    }

    /// Send a chat message and dispatch every streamed event to `handler`.
    ///
    /// Returns `Ok(true)` once a terminal event (`done` or `error`) has been
    /// dispatched; later events, if any arrive, are not processed. Returns
    /// `Ok(false)` when the stream ends without a terminal event or the
    /// handler asked to stop. In-band `error` events are dispatched data, not
    /// an `Err`; only transport faults produce `Err`.
    pub async fn chat_stream_with(
        &self,
        request: &ChatRequest,
        handler: &mut dyn StreamHandler,
    ) -> Result<bool> {
        let events = self.chat_stream(request).await?;
        dispatch_stream(events, handler, self.logger.as_deref()).await
    }

    /// Submit a crop photo for diagnosis.
    pub async fn diagnose(
        &self,
        image: &DiagnosisImage,
        language: &str,
    ) -> Result<DiagnosisResponse> {
        let url = format!("{}/diagnose", self.base_url);
        CLIENT_REQUESTS.click();

        let part = reqwest::multipart::Part::bytes(image.data.clone())
            .file_name(image.filename.clone())
            .mime_str(image.media_type.as_str())
            .map_err(|e| {
                Error::http_client(format!("Failed to build upload: {e}"), Some(Box::new(e)))
            })?;
        let form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("language", language.to_string());

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        let response = response.json::<DiagnosisResponse>().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::serialization(format!("Failed to parse response: {e}"), Some(Box::new(e)))
        })?;

        if let Some(logger) = &self.logger {
            logger.log_diagnosis(&response);
        }
        Ok(response)
    }

    /// Fetch the 7-day weather report for a city.
    pub async fn weather(&self, city: &str) -> Result<WeatherReport> {
        self.get_json(&format!("/weather/{city}")).await
    }

    /// Fetch the crop reference data.
    pub async fn crops(&self) -> Result<serde_json::Value> {
        self.get_json("/crops").await
    }

    /// Fetch the market reference data.
    pub async fn markets(&self) -> Result<serde_json::Value> {
        self.get_json("/markets").await
    }

    /// Fetch the agro-ecological zone reference data.
    pub async fn zones(&self) -> Result<serde_json::Value> {
        self.get_json("/zones").await
    }

    /// Fetch the cities the backend can answer weather questions for.
    pub async fn cities(&self) -> Result<HashMap<String, CityInfo>> {
        self.get_json("/cities").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        CLIENT_REQUESTS.click();

        let response = self
            .client
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::serialization(format!("Failed to parse response: {e}"), Some(Box::new(e)))
        })
    }
}

impl fmt::Debug for AgriAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgriAgent")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Dispatch a stream of decoded events to a handler, stopping at the first
/// terminal event.
///
/// Every event is forwarded to `logger` before its handler callback. An `Err`
/// item is returned as-is; events dispatched before it stay dispatched.
///
/// # Example
///
/// ```
/// use agriagent::{StreamHandler, TokenEvent, dispatch_stream};
/// use futures::stream;
///
/// struct Collect(String);
///
/// impl StreamHandler for Collect {
///     fn on_routing(&mut self, _: &[String]) {}
///     fn on_token(&mut self, text: &str) {
///         self.0.push_str(text);
///     }
///     fn on_done(&mut self, _: &[String], _: &str) {}
///     fn on_error(&mut self, _: &str) {}
/// }
///
/// let events = vec![
///     Ok(TokenEvent::new("Il ").into()),
///     Ok(TokenEvent::new("pleut").into()),
/// ];
/// let mut handler = Collect(String::new());
/// # tokio_test::block_on(async {
/// let terminal = dispatch_stream(stream::iter(events), &mut handler, None)
///     .await
///     .unwrap();
/// assert!(!terminal);
/// # });
/// assert_eq!(handler.0, "Il pleut");
/// ```
pub async fn dispatch_stream<S>(
    events: S,
    handler: &mut dyn StreamHandler,
    logger: Option<&dyn ClientLogger>,
) -> Result<bool>
where
    S: Stream<Item = Result<ChatStreamEvent>>,
{
    futures::pin_mut!(events);
    while let Some(event) = events.next().await {
        let event = event?;
        if let Some(logger) = logger {
            logger.log_stream_event(&event);
        }
        match &event {
            ChatStreamEvent::Routing(e) => handler.on_routing(&e.agents),
            ChatStreamEvent::Token(e) => handler.on_token(&e.text),
            ChatStreamEvent::Done(e) => handler.on_done(&e.agents_used, &e.language),
            ChatStreamEvent::Error(e) => handler.on_error(&e.message),
        }
        if event.is_terminal() {
            return Ok(true);
        }
        if handler.should_interrupt() {
            return Ok(false);
        }
    }
    Ok(false)
}
